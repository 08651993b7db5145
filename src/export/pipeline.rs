//! Export pipeline driver
//!
//! An export run walks an ordered list of [`ExportTier`]s. Each tier is
//! tried once; the first one whose image also encodes as PNG wins. Failures
//! are collected, never propagated, until the list is exhausted.

use std::fmt;

use image::RgbaImage;
use log::{debug, info, warn};

use super::artifact::{encode_png, ExportArtifact};
use crate::preview::RenderedPreview;

/// Logical width of the post card in points.
pub const CARD_WIDTH: f32 = 500.0;
/// Smallest card height in points.
pub const MIN_CARD_HEIGHT: f32 = 200.0;
/// Baseline of the first body line.
pub const BODY_TOP: f32 = 90.0;
/// Distance between body baselines.
pub const BODY_LINE_HEIGHT: f32 = 20.0;
/// Space reserved under the body for the divider and stats row.
const FOOTER_HEIGHT: f32 = 65.0;

/// Default device scale of exported images.
pub const DEFAULT_EXPORT_SCALE: f32 = 2.0;

// ─────────────────────────────────────────────────────────────────────────────
// Tier Identity & Errors
// ─────────────────────────────────────────────────────────────────────────────

/// Which strategy produced (or failed to produce) an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierKind {
    /// Rasterize the live preview through an external capability
    Library,
    /// Rebuild the card as SVG and rasterize it
    Vector,
    /// Draw a minimal placeholder directly onto a pixel canvas
    Canvas,
}

impl TierKind {
    pub fn label(&self) -> &'static str {
        match self {
            TierKind::Library => "library rasterization",
            TierKind::Vector => "vector reconstruction",
            TierKind::Canvas => "manual canvas",
        }
    }
}

/// Why a single tier did not produce an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TierError {
    /// The rasterization capability is not available (expected, not logged as a warning)
    CapabilityAbsent,
    /// The capability was present but failed
    RasterizationFailed(String),
    /// The reconstructed vector image could not be decoded
    ImageDecodeFailed(String),
    /// The tier produced pixels that could not be encoded as PNG
    Encode(String),
    /// The manual canvas could not be allocated or drawn
    Canvas(String),
}

impl fmt::Display for TierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TierError::CapabilityAbsent => write!(f, "rasterization capability not available"),
            TierError::RasterizationFailed(msg) => write!(f, "rasterization failed: {}", msg),
            TierError::ImageDecodeFailed(msg) => write!(f, "image decode failed: {}", msg),
            TierError::Encode(msg) => write!(f, "PNG encoding failed: {}", msg),
            TierError::Canvas(msg) => write!(f, "canvas drawing failed: {}", msg),
        }
    }
}

impl std::error::Error for TierError {}

/// A failed tier, kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierAttempt {
    pub tier: TierKind,
    pub error: TierError,
}

/// Errors surfaced by a whole pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportError {
    /// Every tier failed
    Exhausted(Vec<TierAttempt>),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::Exhausted(attempts) => {
                write!(f, "all export strategies failed")?;
                for attempt in attempts {
                    write!(f, "; {}: {}", attempt.tier.label(), attempt.error)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ExportError {}

// ─────────────────────────────────────────────────────────────────────────────
// Raster Request
// ─────────────────────────────────────────────────────────────────────────────

/// Size of the card to export, in logical points, and the output scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterRequest {
    pub width: f32,
    pub height: f32,
    pub scale: f32,
}

impl RasterRequest {
    pub fn new(width: f32, height: f32, scale: f32) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
            scale: if scale.is_finite() && scale > 0.0 {
                scale
            } else {
                DEFAULT_EXPORT_SCALE
            },
        }
    }

    /// Request sized from the card layout of `preview`.
    pub fn for_preview(preview: &RenderedPreview, scale: f32) -> Self {
        Self::new(CARD_WIDTH, card_height(preview.body_line_count()), scale)
    }

    /// Output width in pixels.
    pub fn pixel_width(&self) -> u32 {
        (self.width * self.scale).round().max(1.0) as u32
    }

    /// Output height in pixels.
    pub fn pixel_height(&self) -> u32 {
        (self.height * self.scale).round().max(1.0) as u32
    }
}

/// Card height needed for `body_lines` lines of body text.
pub fn card_height(body_lines: usize) -> f32 {
    let lines = body_lines.max(1) as f32;
    let last_baseline = BODY_TOP + (lines - 1.0) * BODY_LINE_HEIGHT;
    (last_baseline + FOOTER_HEIGHT).max(MIN_CARD_HEIGHT)
}

// ─────────────────────────────────────────────────────────────────────────────
// Strategy Trait & Driver
// ─────────────────────────────────────────────────────────────────────────────

/// One fallback strategy.
pub trait ExportTier {
    fn kind(&self) -> TierKind;

    /// Produce an image of the card at `request.scale`.
    fn rasterize(
        &self,
        preview: &RenderedPreview,
        request: &RasterRequest,
    ) -> Result<RgbaImage, TierError>;
}

impl<T: ExportTier + ?Sized> ExportTier for &T {
    fn kind(&self) -> TierKind {
        (**self).kind()
    }

    fn rasterize(
        &self,
        preview: &RenderedPreview,
        request: &RasterRequest,
    ) -> Result<RgbaImage, TierError> {
        (**self).rasterize(preview, request)
    }
}

/// Ordered list of tiers.
#[derive(Default)]
pub struct ExportPipeline<'a> {
    tiers: Vec<Box<dyn ExportTier + 'a>>,
}

impl<'a> ExportPipeline<'a> {
    pub fn new() -> Self {
        Self { tiers: Vec::new() }
    }

    /// Append a tier to the end of the chain.
    pub fn with_tier(mut self, tier: impl ExportTier + 'a) -> Self {
        self.tiers.push(Box::new(tier));
        self
    }

    pub fn tier_kinds(&self) -> Vec<TierKind> {
        self.tiers.iter().map(|tier| tier.kind()).collect()
    }

    /// Run the chain against a snapshot of the preview.
    pub fn run(
        &self,
        preview: &RenderedPreview,
        request: &RasterRequest,
    ) -> Result<ExportArtifact, ExportError> {
        let mut attempts = Vec::new();

        for tier in &self.tiers {
            let kind = tier.kind();
            debug!(
                "Export: trying {} at {}x{} px",
                kind.label(),
                request.pixel_width(),
                request.pixel_height()
            );

            let result = tier
                .rasterize(preview, request)
                .and_then(|image| encode_png(&image).map(|png| (image, png)));

            match result {
                Ok((image, png)) => {
                    info!(
                        "Export: {} produced {}x{} image ({} bytes)",
                        kind.label(),
                        image.width(),
                        image.height(),
                        png.len()
                    );
                    return Ok(ExportArtifact {
                        image,
                        png,
                        tier: kind,
                    });
                }
                Err(TierError::CapabilityAbsent) => {
                    debug!("Export: {} unavailable, falling through", kind.label());
                    attempts.push(TierAttempt {
                        tier: kind,
                        error: TierError::CapabilityAbsent,
                    });
                }
                Err(error) => {
                    warn!("Export: {} failed: {}", kind.label(), error);
                    attempts.push(TierAttempt { tier: kind, error });
                }
            }
        }

        Err(ExportError::Exhausted(attempts))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
