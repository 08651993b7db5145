//! Avatar image loading for the preview card
//!
//! Only local files are loaded, given as a plain path or a `file://` URL.
//! Anything else (remote URLs, unreadable or undecodable files) leaves the
//! card showing initials.

use eframe::egui::{self, ColorImage, TextureHandle, TextureOptions};
use log::{debug, warn};
use std::collections::HashMap;
use std::path::PathBuf;

/// Map an avatar source to a local file path.
///
/// Returns `None` for empty sources and for URLs with a scheme other than
/// `file`.
pub fn resolve_avatar_path(source: &str) -> Option<PathBuf> {
    let source = source.trim();
    if source.is_empty() {
        return None;
    }

    if let Some(path) = source.strip_prefix("file://") {
        return (!path.is_empty()).then(|| PathBuf::from(path));
    }

    if source.contains("://") || source.starts_with("data:") {
        return None;
    }

    Some(PathBuf::from(source))
}

/// Decode an image file into an egui image.
fn load_color_image(path: &PathBuf) -> Result<ColorImage, image::ImageError> {
    let rgba = image::open(path)?.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    Ok(ColorImage::from_rgba_unmultiplied(size, rgba.as_raw()))
}

/// Textures for avatar sources, loaded once per distinct source.
#[derive(Default)]
pub struct AvatarCache {
    /// `None` records a source that could not be loaded
    textures: HashMap<String, Option<TextureHandle>>,
}

impl AvatarCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Texture for `source`, loading it on first use.
    pub fn texture(&mut self, ctx: &egui::Context, source: &str) -> Option<TextureHandle> {
        if let Some(cached) = self.textures.get(source) {
            return cached.clone();
        }

        let texture = match resolve_avatar_path(source) {
            Some(path) => match load_color_image(&path) {
                Ok(image) => {
                    debug!("Loaded avatar from {}", path.display());
                    Some(ctx.load_texture(
                        format!("avatar:{}", source),
                        image,
                        TextureOptions::LINEAR,
                    ))
                }
                Err(e) => {
                    warn!("Failed to load avatar {}: {}", path.display(), e);
                    None
                }
            },
            None => {
                debug!("Avatar source {} is not a local file", source);
                None
            }
        };

        self.textures.insert(source.to_string(), texture.clone());
        texture
    }

    /// Forget every cached texture so files are re-read.
    pub fn clear(&mut self) {
        self.textures.clear();
    }
}
