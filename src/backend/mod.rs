/// Backend submodules
///
/// - `session`: transport + event stream for one connection
/// - `handlers`: UI action dispatch and session event translation
/// - `main_loop`: the runtime and polling loop
mod handlers;
mod main_loop;
mod session;

pub use main_loop::run_backend;
