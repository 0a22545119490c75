//! Message list for the chat view.

use eframe::egui::{self, RichText};

use crate::buffer::{ChatBuffer, IconCache, RenderedMessage};
use crate::ui::avatars::{render_avatar, AvatarTextures};
use crate::ui::theme::{nick_color, ChatTheme};

const AVATAR_SIZE: f32 = 32.0;

/// Render the room's messages, pinned to the newest one.
pub fn render_messages(
    ui: &mut egui::Ui,
    buffer: &ChatBuffer,
    icons: &IconCache,
    textures: &mut AvatarTextures,
    theme: &ChatTheme,
) {
    egui::ScrollArea::vertical()
        .auto_shrink([false; 2])
        .stick_to_bottom(true)
        .show(ui, |ui| {
            ui.add_space(8.0);

            if buffer.is_empty() {
                ui.vertical_centered(|ui| {
                    ui.add_space(24.0);
                    ui.label(
                        RichText::new("No messages yet. Start the conversation!")
                            .color(theme.text_muted),
                    );
                });
                return;
            }

            for msg in &buffer.messages {
                match RenderedMessage::from_message(msg, icons) {
                    RenderedMessage::System { text } => render_system_message(ui, &text, theme),
                    RenderedMessage::User {
                        author,
                        initials,
                        time,
                        body,
                        icon,
                    } => {
                        ui.horizontal_top(|ui| {
                            ui.add_space(8.0);
                            // Nickname-less authors still get the "U" circle
                            let seed = if author.is_empty() { initials.as_str() } else { author.as_str() };
                            render_avatar(ui, textures, seed, icon.as_deref(), "U", AVATAR_SIZE);
                            ui.vertical(|ui| {
                                ui.horizontal(|ui| {
                                    ui.label(RichText::new(&author).strong().color(nick_color(&author)));
                                    ui.label(RichText::new(&time).small().color(theme.text_muted));
                                });
                                ui.label(RichText::new(&body).color(theme.text_primary));
                            });
                        });
                        ui.add_space(6.0);
                    }
                }
            }

            ui.add_space(8.0);
        });
}

fn render_system_message(ui: &mut egui::Ui, text: &str, theme: &ChatTheme) {
    ui.vertical_centered(|ui| {
        ui.label(RichText::new(text).italics().size(12.0).color(theme.text_muted));
    });
    ui.add_space(4.0);
}
