//! Library rasterization tier
//!
//! The first tier asks an external [`ElementRasterizer`] to turn the live
//! preview element into pixels. The capability is optional: with none
//! installed the tier reports `CapabilityAbsent` and the chain moves on.
//!
//! The rasterizer shipped with the app, [`FrameCapture`], works from an egui
//! viewport screenshot: it crops the card out of the frame, resamples it to
//! the export scale and clears the pixels outside the rounded corners.

use egui::ColorImage;
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

use super::pipeline::{ExportTier, RasterRequest, TierError, TierKind};
use crate::preview::RenderedPreview;

/// Corner radius of the card in points.
pub const CARD_CORNER_RADIUS: f32 = 16.0;

/// Something that can rasterize the on-screen preview element.
pub trait ElementRasterizer {
    /// Rasterize at `request.scale` with a transparent background.
    fn rasterize_element(&self, request: &RasterRequest) -> Result<RgbaImage, TierError>;
}

/// Tier 1: delegate to the optional rasterization capability.
pub struct LibraryTier<'a> {
    rasterizer: Option<&'a dyn ElementRasterizer>,
}

impl<'a> LibraryTier<'a> {
    pub fn new(rasterizer: Option<&'a dyn ElementRasterizer>) -> Self {
        Self { rasterizer }
    }
}

impl ExportTier for LibraryTier<'_> {
    fn kind(&self) -> TierKind {
        TierKind::Library
    }

    fn rasterize(
        &self,
        _preview: &RenderedPreview,
        request: &RasterRequest,
    ) -> Result<RgbaImage, TierError> {
        let rasterizer = self.rasterizer.ok_or(TierError::CapabilityAbsent)?;
        rasterizer.rasterize_element(request)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Frame Capture
// ─────────────────────────────────────────────────────────────────────────────

/// A captured window frame plus where the card sits in it.
#[derive(Debug, Clone)]
pub struct FrameCapture {
    frame: RgbaImage,
    /// Card rectangle in logical points: `[left, top, width, height]`
    element: [f32; 4],
    pixels_per_point: f32,
}

impl FrameCapture {
    pub fn new(frame: RgbaImage, element: [f32; 4], pixels_per_point: f32) -> Self {
        Self {
            frame,
            element,
            pixels_per_point,
        }
    }

    /// Element rectangle in frame pixels.
    ///
    /// `None` unless the whole element lies inside the frame.
    fn pixel_region(&self) -> Option<(u32, u32, u32, u32)> {
        let ppp = self.pixels_per_point;
        if !ppp.is_finite() || ppp <= 0.0 {
            return None;
        }

        let [left, top, width, height] = self.element;
        let x0 = (left * ppp).round();
        let y0 = (top * ppp).round();
        let x1 = ((left + width) * ppp).round();
        let y1 = ((top + height) * ppp).round();

        let inside = x0 >= 0.0
            && y0 >= 0.0
            && x1 <= self.frame.width() as f32
            && y1 <= self.frame.height() as f32;
        if !inside || x1 <= x0 || y1 <= y0 {
            return None;
        }

        let (x0, y0) = (x0 as u32, y0 as u32);
        Some((x0, y0, x1 as u32 - x0, y1 as u32 - y0))
    }
}

impl ElementRasterizer for FrameCapture {
    fn rasterize_element(&self, request: &RasterRequest) -> Result<RgbaImage, TierError> {
        let (x, y, width, height) = self.pixel_region().ok_or_else(|| {
            TierError::RasterizationFailed("preview is not fully inside the captured frame".to_string())
        })?;

        let cropped = imageops::crop_imm(&self.frame, x, y, width, height).to_image();

        let target_w = request.pixel_width();
        let target_h = request.pixel_height();
        let mut image = if cropped.dimensions() == (target_w, target_h) {
            cropped
        } else {
            imageops::resize(&cropped, target_w, target_h, FilterType::Lanczos3)
        };

        clear_outside_rounded_rect(&mut image, CARD_CORNER_RADIUS * request.scale);
        Ok(image)
    }
}

/// Convert an egui viewport screenshot into an image buffer.
///
/// Returns `None` if the pixel count does not match the reported size.
pub fn frame_from_color_image(shot: &ColorImage) -> Option<RgbaImage> {
    let [width, height] = shot.size;
    let bytes: Vec<u8> = shot
        .pixels
        .iter()
        .flat_map(|pixel| pixel.to_srgba_unmultiplied())
        .collect();
    RgbaImage::from_raw(u32::try_from(width).ok()?, u32::try_from(height).ok()?, bytes)
}

/// Make the pixels outside a rounded rectangle fully transparent.
pub fn clear_outside_rounded_rect(image: &mut RgbaImage, radius: f32) {
    let (width, height) = image.dimensions();
    let radius = radius.min(width as f32 / 2.0).min(height as f32 / 2.0);
    if radius <= 0.0 {
        return;
    }

    let w = width as f32;
    let h = height as f32;

    for (x, y, pixel) in image.enumerate_pixels_mut() {
        // Pixel centre
        let px = x as f32 + 0.5;
        let py = y as f32 + 0.5;

        let cx = if px < radius {
            radius
        } else if px > w - radius {
            w - radius
        } else {
            continue;
        };
        let cy = if py < radius {
            radius
        } else if py > h - radius {
            h - radius
        } else {
            continue;
        };

        let distance = ((px - cx).powi(2) + (py - cy).powi(2)).sqrt();
        if distance > radius {
            *pixel = Rgba([0, 0, 0, 0]);
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
