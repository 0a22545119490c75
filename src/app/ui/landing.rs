//! Landing screen: nickname, avatar and room forms

use eframe::egui::{self, Color32, RichText, Stroke};

use crate::app::PartyChatApp;
use crate::ui::{self, ChatTheme};
use crate::validation::MAX_NICKNAME_LEN;

const PREVIEW_SIZE: f32 = 48.0;

impl PartyChatApp {
    pub(in crate::app) fn render_landing(&mut self, ctx: &egui::Context) {
        let theme = self.get_theme();

        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(theme.surface[0]))
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.add_space(48.0);
                    egui::Frame::new()
                        .fill(theme.surface[2])
                        .corner_radius(10.0)
                        .inner_margin(egui::Margin::same(24))
                        .show(ui, |ui| {
                            ui.set_max_width(360.0);
                            ui.heading("Party Chat");
                            ui.add_space(4.0);
                            render_status(ui, self.state.connection_ready, &theme);
                            ui.add_space(16.0);

                            self.render_profile(ui);
                            ui.add_space(16.0);
                            self.render_room_forms(ui);

                            if let Some(err) = &self.state.error {
                                ui.add_space(12.0);
                                ui.label(RichText::new(err).color(theme.error));
                            }
                        });
                });
            });
    }

    fn render_profile(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let icon = self.state.user_icon.as_ref().map(|i| i.as_str().to_string());
            ui::render_avatar(
                ui,
                &mut self.avatars,
                &self.state.nickname,
                icon.as_deref(),
                "?",
                PREVIEW_SIZE,
            );
            ui.vertical(|ui| {
                ui.add(
                    egui::TextEdit::singleline(&mut self.state.nickname)
                        .char_limit(MAX_NICKNAME_LEN)
                        .hint_text("Your nickname"),
                );
                if ui.button("Choose Image").clicked() {
                    self.choose_icon();
                }
            });
        });
    }

    fn render_room_forms(&mut self, ui: &mut egui::Ui) {
        let create = ui.add_enabled(
            self.state.can_create_room(),
            egui::Button::new("Create New Room").min_size(egui::vec2(200.0, 0.0)),
        );
        if create.clicked() {
            self.create_room();
        }

        ui.add_space(12.0);
        ui.label(RichText::new("or join an existing room").small());
        ui.add_space(4.0);

        ui.horizontal(|ui| {
            let field = ui.add(
                egui::TextEdit::singleline(&mut self.state.join_room_id).hint_text("Room ID"),
            );
            let submitted =
                field.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            let join = ui.add_enabled(self.state.can_join_room(), egui::Button::new("Join Room"));
            if join.clicked() || (submitted && self.state.can_join_room()) {
                self.join_room();
            }
        });
    }
}

/// Status dot plus label
fn render_status(ui: &mut egui::Ui, connected: bool, theme: &ChatTheme) {
    ui.horizontal(|ui| {
        let (rect, _) = ui.allocate_exact_size(egui::vec2(10.0, 10.0), egui::Sense::hover());
        let center = rect.center();
        if connected {
            ui.painter()
                .circle_filled(center, 6.0, Color32::from_rgba_unmultiplied(67, 181, 129, 40));
            ui.painter().circle_filled(center, 4.0, theme.success);
            ui.label(RichText::new("Connected").color(theme.text_secondary));
        } else {
            ui.painter()
                .circle_stroke(center, 4.0, Stroke::new(1.5, theme.text_muted));
            ui.label(RichText::new("Connecting...").color(theme.text_muted));
        }
    });
}
