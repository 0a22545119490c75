//! Connection lost overlay

use eframe::egui::{self, RichText};

use crate::app::PartyChatApp;

impl PartyChatApp {
    pub(in crate::app) fn render_connection_lost(&mut self, ctx: &egui::Context) {
        let theme = self.get_theme();

        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(theme.surface[0]))
            .show(ctx, |_| {});

        egui::Window::new("Connection Lost")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .frame(
                egui::Frame::window(&ctx.style())
                    .fill(theme.surface[4])
                    .inner_margin(egui::Margin::same(20)),
            )
            .show(ctx, |ui| {
                ui.label(
                    RichText::new("The connection to the server was closed.")
                        .color(theme.text_primary),
                );
                ui.add_space(12.0);
                if ui.button("Reload").clicked() {
                    self.reload();
                }
            });
    }
}
