//! Party Chat - a small group chat client built with egui
//!
//! Architecture:
//! - Main thread: runs the egui UI
//! - Backend thread: runs a Tokio runtime for the chat session and image work
//! - Communication via crossbeam channels (lock-free, sync-safe)

use eframe::egui;
use tracing_subscriber::EnvFilter;

use party_chat::app::PartyChatApp;
use party_chat::config::ClientConfig;

fn main() -> eframe::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("party_chat=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = ClientConfig::load();
    tracing::info!(theme = ?config.theme, "starting party chat");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([720.0, 640.0])
            .with_min_inner_size([400.0, 420.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Party Chat",
        options,
        Box::new(|cc| Ok(Box::new(PartyChatApp::new(cc, config)))),
    )
}
