//! Chat screen: room header, messages, typing indicator and input

use std::time::Instant;

use eframe::egui::{self, RichText};

use crate::app::PartyChatApp;
use crate::ui;

impl PartyChatApp {
    pub(in crate::app) fn render_chat(&mut self, ctx: &egui::Context) {
        let theme = self.get_theme();

        egui::TopBottomPanel::top("room_header")
            .frame(
                egui::Frame::new()
                    .fill(theme.surface[1])
                    .inner_margin(egui::Margin::symmetric(12, 8))
                    .stroke(egui::Stroke::new(1.0, theme.border_medium)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new("Room").color(theme.text_muted));
                    let room_id = self.state.room_id.clone().unwrap_or_default();
                    ui.label(RichText::new(&room_id).monospace().color(theme.text_primary));
                    if ui.small_button("Copy").on_hover_text("Copy room ID").clicked() {
                        self.copy_room_id(ctx);
                    }
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Leave Room").clicked() {
                            self.leave_room();
                        }
                    });
                });
            });

        self.render_input_panel(ctx);

        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(theme.surface[2]))
            .show(ctx, |ui| {
                if let Some(err) = &self.state.error {
                    ui.label(RichText::new(err).color(theme.error));
                }
                ui::render_messages(
                    ui,
                    &self.state.buffer,
                    &self.state.icon_cache,
                    &mut self.avatars,
                    &theme,
                );
            });
    }

    fn render_input_panel(&mut self, ctx: &egui::Context) {
        let theme = self.get_theme();

        egui::TopBottomPanel::bottom("input_panel")
            .frame(
                egui::Frame::new()
                    .fill(theme.surface[1])
                    .inner_margin(egui::Margin::symmetric(12, 8))
                    .stroke(egui::Stroke::new(1.0, theme.border_medium)),
            )
            .show(ctx, |ui| {
                // Reserve the row so the layout doesn't jump
                let label = self
                    .state
                    .typing_label
                    .map(|who| format!("{} is typing...", who))
                    .unwrap_or_default();
                ui.label(RichText::new(label).small().italics().color(theme.text_muted));

                ui.horizontal(|ui| {
                    let can_send = self.state.can_send();
                    let send_width = 64.0;
                    let response = ui.add(
                        egui::TextEdit::singleline(&mut self.state.message_input)
                            .desired_width(ui.available_width() - send_width)
                            .hint_text("Type a message..."),
                    );
                    if response.changed() {
                        self.typing
                            .input_changed(&self.state.message_input, Instant::now());
                    }

                    let enter = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                    let send = ui.add_enabled(can_send, egui::Button::new("Send"));
                    if send.clicked() || (enter && can_send) {
                        self.send_message();
                        response.request_focus();
                    }
                });
            });
    }
}
