//! Palette and global styling.
//!
//! `surface` runs from the window background (`[0]`) up to the overlay
//! (`[4]`); the chat header and input bar sit on `[1]`, the message area and
//! landing card on `[2]`.

use eframe::egui::{self, Color32, CornerRadius, FontFamily, FontId, TextStyle};

use crate::config::Theme;

const ACCENT: Color32 = Color32::from_rgb(124, 92, 255);
const ONLINE: Color32 = Color32::from_rgb(52, 199, 123);
const DANGER: Color32 = Color32::from_rgb(232, 84, 96);

#[derive(Clone, Debug, PartialEq)]
pub struct ChatTheme {
    pub surface: [Color32; 5],
    pub accent: Color32,
    pub success: Color32,
    pub error: Color32,
    pub text_primary: Color32,
    pub text_secondary: Color32,
    pub text_muted: Color32,
    pub border_medium: Color32,
}

impl ChatTheme {
    pub fn dark() -> Self {
        Self {
            surface: [
                Color32::from_rgb(16, 14, 24),
                Color32::from_rgb(24, 21, 36),
                Color32::from_rgb(31, 28, 46),
                Color32::from_rgb(42, 38, 61),
                Color32::from_rgb(58, 52, 82),
            ],
            accent: ACCENT,
            success: ONLINE,
            error: DANGER,
            text_primary: Color32::from_rgb(240, 238, 250),
            text_secondary: Color32::from_rgb(180, 174, 204),
            text_muted: Color32::from_rgb(120, 114, 144),
            border_medium: Color32::from_rgb(50, 45, 70),
        }
    }

    pub fn light() -> Self {
        Self {
            surface: [
                Color32::from_rgb(250, 249, 255),
                Color32::from_rgb(241, 238, 252),
                Color32::WHITE,
                Color32::from_rgb(232, 228, 248),
                Color32::from_rgb(214, 208, 238),
            ],
            accent: ACCENT,
            success: ONLINE,
            error: DANGER,
            text_primary: Color32::from_rgb(22, 18, 36),
            text_secondary: Color32::from_rgb(78, 72, 100),
            text_muted: Color32::from_rgb(128, 122, 150),
            border_medium: Color32::from_rgb(220, 214, 240),
        }
    }

    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self::dark(),
            Theme::Light => Self::light(),
        }
    }
}

/// Install visuals, text sizes and widget rounding for `theme`.
pub fn apply_app_style(ctx: &egui::Context, theme: Theme) {
    let mut visuals = match theme {
        Theme::Dark => egui::Visuals::dark(),
        Theme::Light => egui::Visuals::light(),
    };
    let radius = CornerRadius::same(8);
    for widget in [
        &mut visuals.widgets.inactive,
        &mut visuals.widgets.hovered,
        &mut visuals.widgets.active,
    ] {
        widget.corner_radius = radius;
    }
    visuals.widgets.active.bg_fill = ACCENT;
    visuals.widgets.active.weak_bg_fill = ACCENT;
    visuals.selection.bg_fill = ACCENT.gamma_multiply(0.4);
    ctx.set_visuals(visuals);

    ctx.style_mut(|style| {
        let sizes = [
            (TextStyle::Small, 11.5, FontFamily::Proportional),
            (TextStyle::Body, 15.0, FontFamily::Proportional),
            (TextStyle::Button, 14.0, FontFamily::Proportional),
            (TextStyle::Heading, 24.0, FontFamily::Proportional),
            (TextStyle::Monospace, 13.5, FontFamily::Monospace),
        ];
        style.text_styles = sizes
            .into_iter()
            .map(|(text_style, size, family)| (text_style, FontId::new(size, family)))
            .collect();
        style.spacing.item_spacing = egui::vec2(8.0, 6.0);
        style.spacing.button_padding = egui::vec2(12.0, 6.0);
    });
}

const AUTHOR_COLORS: [Color32; 8] = [
    Color32::from_rgb(255, 107, 129),
    Color32::from_rgb(255, 159, 67),
    Color32::from_rgb(254, 202, 87),
    Color32::from_rgb(29, 209, 161),
    Color32::from_rgb(72, 219, 251),
    Color32::from_rgb(84, 160, 255),
    Color32::from_rgb(162, 155, 254),
    Color32::from_rgb(243, 104, 224),
];

/// Stable per-nickname color (FNV-1a over the bytes).
pub fn nick_color(nick: &str) -> Color32 {
    let hash = nick.bytes().fold(0xcbf2_9ce4_8422_2325_u64, |h, b| {
        (h ^ u64::from(b)).wrapping_mul(0x0100_0000_01b3)
    });
    AUTHOR_COLORS[(hash % AUTHOR_COLORS.len() as u64) as usize]
}

/// Colored disc with the given letters, for users without an image.
pub fn render_initials_avatar(
    ui: &mut egui::Ui,
    seed: &str,
    initials: &str,
    size: f32,
) -> egui::Response {
    let (rect, response) = ui.allocate_exact_size(egui::vec2(size, size), egui::Sense::hover());
    ui.painter()
        .circle_filled(rect.center(), size / 2.0, nick_color(seed));
    ui.painter().text(
        rect.center(),
        egui::Align2::CENTER_CENTER,
        initials,
        FontId::proportional(size * 0.42),
        Color32::WHITE,
    );
    response
}
