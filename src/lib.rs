//! Party Chat client library.
//!
//! This module re-exports the core components for testing and extension.

pub mod app;
pub mod avatar;
pub mod backend;
pub mod buffer;
pub mod config;
pub mod error;
pub mod events;
pub mod protocol;
pub mod state;
pub mod transport;
pub mod typing;
pub mod ui;
pub mod validation;
