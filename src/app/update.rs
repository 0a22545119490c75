//! Main update loop

use std::time::{Duration, Instant};

use eframe::egui;

use super::PartyChatApp;
use crate::state::Screen;
use crate::ui;

/// Upper bound between frames while idle, so backend events get drained.
const IDLE_REPAINT: Duration = Duration::from_millis(100);
/// Toasts disappear after this long.
const TOAST_LIFETIME: Duration = Duration::from_secs(4);

impl eframe::App for PartyChatApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_events();

        let now = Instant::now();
        self.typing.poll(now);

        // Wake up in time for the typing timer as well
        let repaint = self
            .typing
            .deadline()
            .map(|d| d.saturating_duration_since(now).min(IDLE_REPAINT))
            .unwrap_or(IDLE_REPAINT);
        ctx.request_repaint_after(repaint);

        self.state.purge_old_status_messages(TOAST_LIFETIME.as_secs());

        if self.state.connection_closed {
            self.render_connection_lost(ctx);
            return;
        }

        match self.state.screen {
            Screen::Landing => self.render_landing(ctx),
            Screen::Chat => self.render_chat(ctx),
        }

        let theme = self.get_theme();
        ui::render_status_toasts(ctx, &self.state.status_messages, TOAST_LIFETIME, &theme);
    }
}
