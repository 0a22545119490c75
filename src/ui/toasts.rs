//! Short-lived notices ("Room ID copied") stacked under the header.

use std::time::{Duration, Instant};

use eframe::egui::{self, RichText};

use crate::ui::ChatTheme;

/// Toasts start fading this long before they are purged.
const FADE: Duration = Duration::from_millis(600);

pub fn render_status_toasts(
    ctx: &egui::Context,
    toasts: &[(String, Instant)],
    lifetime: Duration,
    theme: &ChatTheme,
) {
    if toasts.is_empty() {
        return;
    }

    egui::Area::new(egui::Id::new("status_toasts"))
        .anchor(egui::Align2::CENTER_TOP, [0.0, 56.0])
        .interactable(false)
        .show(ctx, |ui| {
            for (text, created) in toasts {
                let remaining = lifetime.saturating_sub(created.elapsed());
                let opacity = (remaining.as_secs_f32() / FADE.as_secs_f32()).min(1.0);
                egui::Frame::new()
                    .fill(theme.surface[4].gamma_multiply(opacity))
                    .corner_radius(12.0)
                    .inner_margin(egui::Margin::symmetric(14, 6))
                    .show(ui, |ui| {
                        ui.label(
                            RichText::new(text).color(theme.success.gamma_multiply(opacity)),
                        );
                    });
                ui.add_space(4.0);
            }
        });
}
