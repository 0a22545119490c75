//! Texture cache for avatar data URIs.

use std::collections::HashMap;

use eframe::egui::{self, ColorImage, TextureHandle, TextureOptions};
use tracing::debug;

use crate::avatar::decode_data_uri;
use crate::buffer::initials;
use crate::ui::theme;

/// Decoded avatars keyed by data URI. Undecodable URIs are remembered as
/// `None` so they are not retried every frame.
#[derive(Default)]
pub struct AvatarTextures {
    textures: HashMap<String, Option<TextureHandle>>,
}

impl AvatarTextures {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, ctx: &egui::Context, data_uri: &str) -> Option<&TextureHandle> {
        if !self.textures.contains_key(data_uri) {
            let texture = decode_data_uri(data_uri).map(|img| {
                let size = [img.width() as usize, img.height() as usize];
                let color = ColorImage::from_rgba_unmultiplied(size, img.as_raw());
                let name = format!("avatar-{}", self.textures.len());
                ctx.load_texture(name, color, TextureOptions::LINEAR)
            });
            if texture.is_none() {
                debug!(len = data_uri.len(), "avatar data URI did not decode");
            }
            self.textures.insert(data_uri.to_string(), texture);
        }
        self.textures.get(data_uri).and_then(Option::as_ref)
    }

    pub fn clear(&mut self) {
        self.textures.clear();
    }
}

/// Draw an image avatar when `icon` decodes, otherwise initials on a colored
/// circle. `placeholder` replaces empty initials.
pub fn render_avatar(
    ui: &mut egui::Ui,
    textures: &mut AvatarTextures,
    name: &str,
    icon: Option<&str>,
    placeholder: &str,
    size: f32,
) -> egui::Response {
    let ctx = ui.ctx().clone();
    if let Some(texture) = icon.and_then(|uri| textures.get(&ctx, uri)) {
        let sized = egui::load::SizedTexture::new(texture.id(), egui::vec2(size, size));
        return ui.add(egui::Image::from_texture(sized).corner_radius(size / 2.0));
    }

    let mut letters = initials(name);
    if letters.is_empty() {
        letters = placeholder.to_string();
    }
    theme::render_initials_avatar(ui, name, &letters, size)
}
