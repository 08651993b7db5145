//! Manual canvas tier
//!
//! The terminal fallback. Paints a fixed placeholder composition straight
//! into an `RgbaImage`: theme background, a title, the handle line and a
//! one-line stats summary. Text goes through `cosmic-text`; when no font can
//! be found the text is skipped and the background alone is returned.
//! Requests larger than [`MAX_CANVAS_SIDE`] are drawn at a reduced scale
//! with the same aspect ratio.

use std::cell::RefCell;

use cosmic_text::{
    fontdb, Attrs, Buffer, Color, Family, FontSystem, Metrics, Shaping, SwashCache, Weight,
};
use image::{Rgba, RgbaImage};
use log::debug;

use super::pipeline::{ExportTier, RasterRequest, TierError, TierKind};
use crate::preview::RenderedPreview;
use crate::theme::{PostPalette, Rgb};

/// Largest canvas side in pixels.
pub const MAX_CANVAS_SIDE: u32 = 16_384;

const TITLE: &str = "Screenshot Generated";
const SUBTITLE: &str = "Your viral post content appears here";

/// One line of text in card points.
struct TextLine {
    text: String,
    x: f32,
    baseline: f32,
    size: f32,
    bold: bool,
    color: Rgb,
}

/// Tier 3: draw a minimal card by hand.
pub struct CanvasTier {
    /// cosmic-text cannot shape anything with an empty database
    has_fonts: bool,
    fonts: RefCell<FontSystem>,
    glyphs: RefCell<SwashCache>,
}

impl CanvasTier {
    /// Create the tier, optionally loading system fonts, with `bundled`
    /// always available as the sans-serif fallback.
    pub fn new(load_system: bool, bundled: Option<&[u8]>) -> Self {
        let mut db = fontdb::Database::new();
        if load_system {
            db.load_system_fonts();
        }
        let system_has_fonts = db.faces().next().is_some();

        if let Some(data) = bundled {
            db.load_font_data(data.to_vec());
            if !system_has_fonts {
                let family = db
                    .faces()
                    .find_map(|face| face.families.first().map(|(name, _)| name.clone()));
                if let Some(family) = family {
                    db.set_sans_serif_family(family);
                }
            }
        }
        debug!("Canvas tier font database has {} faces", db.len());

        let has_fonts = db.faces().next().is_some();
        Self {
            has_fonts,
            fonts: RefCell::new(FontSystem::new_with_locale_and_db("en-US".to_string(), db)),
            glyphs: RefCell::new(SwashCache::new()),
        }
    }

    /// Shrink the request scale until both sides fit the canvas limit.
    fn fitted(request: &RasterRequest) -> RasterRequest {
        let longest = request.width.max(request.height);
        let limit = MAX_CANVAS_SIDE as f32 / longest;
        if request.scale <= limit {
            return *request;
        }
        debug!(
            "Canvas scale reduced from {} to {} for a {}x{} card",
            request.scale, limit, request.width, request.height
        );
        RasterRequest::new(request.width, request.height, limit)
    }

    fn lines(preview: &RenderedPreview, palette: &PostPalette, height: f32) -> Vec<TextLine> {
        vec![
            TextLine {
                text: TITLE.to_string(),
                x: 20.0,
                baseline: 50.0,
                size: 15.0,
                bold: true,
                color: palette.text,
            },
            TextLine {
                text: SUBTITLE.to_string(),
                x: 20.0,
                baseline: 80.0,
                size: 13.0,
                bold: false,
                color: palette.text,
            },
            TextLine {
                text: format!("@{} • {}", preview.handle, preview.timestamp),
                x: 20.0,
                baseline: 100.0,
                size: 13.0,
                bold: false,
                color: palette.text,
            },
            TextLine {
                text: stats_summary(preview),
                x: 20.0,
                baseline: height - 20.0,
                size: 13.0,
                bold: false,
                color: palette.secondary,
            },
        ]
    }
}

impl ExportTier for CanvasTier {
    fn kind(&self) -> TierKind {
        TierKind::Canvas
    }

    fn rasterize(
        &self,
        preview: &RenderedPreview,
        request: &RasterRequest,
    ) -> Result<RgbaImage, TierError> {
        let request = Self::fitted(request);
        let width = request.pixel_width().min(MAX_CANVAS_SIDE);
        let height = request.pixel_height().min(MAX_CANVAS_SIDE);

        let palette = PostPalette::for_theme(preview.theme);
        let mut canvas = RgbaImage::from_pixel(width, height, palette.background.to_rgba());
        if !self.has_fonts {
            debug!("No fonts available; canvas text skipped");
            return Ok(canvas);
        }

        let mut fonts = self
            .fonts
            .try_borrow_mut()
            .map_err(|_| TierError::Canvas("font system already in use".to_string()))?;
        let mut glyphs = self
            .glyphs
            .try_borrow_mut()
            .map_err(|_| TierError::Canvas("glyph cache already in use".to_string()))?;

        for line in Self::lines(preview, &palette, request.height) {
            draw_text(&mut fonts, &mut glyphs, &mut canvas, &line, request.scale);
        }

        Ok(canvas)
    }
}

/// `"890 replies • 3.2K retweets • 15.4K likes"`
pub fn stats_summary(preview: &RenderedPreview) -> String {
    format!(
        "{} replies • {} retweets • {} likes",
        preview.replies, preview.retweets, preview.likes
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Text Painting
// ─────────────────────────────────────────────────────────────────────────────

fn draw_text(
    fonts: &mut FontSystem,
    glyphs: &mut SwashCache,
    canvas: &mut RgbaImage,
    line: &TextLine,
    scale: f32,
) {
    let size = line.size * scale;
    let mut buffer = Buffer::new(fonts, Metrics::new(size, size * 1.2));
    let weight = if line.bold { Weight::BOLD } else { Weight::NORMAL };
    buffer.set_text(
        fonts,
        &line.text,
        Attrs::new().family(Family::SansSerif).weight(weight),
        Shaping::Advanced,
    );
    buffer.shape_until_scroll(fonts, false);

    let Some(line_y) = buffer.layout_runs().next().map(|run| run.line_y) else {
        return;
    };

    let origin_x = (line.x * scale).round() as i32;
    let origin_y = (line.baseline * scale - line_y).round() as i32;
    let Rgb(r, g, b) = line.color;

    // A second pass one stroke to the right thickens faces that have no bold cut
    let offsets: &[i32] = if line.bold {
        &[0, (scale / 2.0).round().max(1.0) as i32]
    } else {
        &[0]
    };

    for &dx in offsets {
        buffer.draw(fonts, glyphs, Color::rgb(r, g, b), |x, y, w, h, color| {
            blend_rect(canvas, origin_x + dx + x, origin_y + y, w, h, color);
        });
    }
}

/// Source-over blend a solid rectangle onto the canvas, clipped to its bounds.
fn blend_rect(canvas: &mut RgbaImage, x: i32, y: i32, w: u32, h: u32, color: Color) {
    let alpha = color.a() as u32;
    if alpha == 0 {
        return;
    }

    let (cw, ch) = (canvas.width() as i64, canvas.height() as i64);
    let x0 = (x as i64).max(0);
    let y0 = (y as i64).max(0);
    let x1 = (x as i64 + w as i64).min(cw);
    let y1 = (y as i64 + h as i64).min(ch);

    for py in y0..y1 {
        for px in x0..x1 {
            let dst = canvas.get_pixel_mut(px as u32, py as u32);
            *dst = blend(*dst, color, alpha);
        }
    }
}

fn blend(dst: Rgba<u8>, src: Color, alpha: u32) -> Rgba<u8> {
    let inv = 255 - alpha;
    let mix = |s: u8, d: u8| ((s as u32 * alpha + d as u32 * inv + 127) / 255) as u8;
    let out_alpha = alpha + (dst[3] as u32 * inv + 127) / 255;
    Rgba([
        mix(src.r(), dst[0]),
        mix(src.g(), dst[1]),
        mix(src.b(), dst[2]),
        out_alpha.min(255) as u8,
    ])
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExportSettings;
    use crate::draft::{PostForm, PostTheme, Preset};
    use crate::export::capture::LibraryTier;
    use crate::export::fonts::bundled_font;
    use crate::export::pipeline::ExportPipeline;
    use crate::format::MAX_POST_CHARS;

    fn tier() -> CanvasTier {
        let font = bundled_font();
        CanvasTier::new(false, font.as_deref())
    }

    /// Vector tier stand-in whose image never decodes.
    struct BrokenVector;

    impl ExportTier for BrokenVector {
        fn kind(&self) -> TierKind {
            TierKind::Vector
        }

        fn rasterize(
            &self,
            _preview: &RenderedPreview,
            _request: &RasterRequest,
        ) -> Result<RgbaImage, TierError> {
            Err(TierError::ImageDecodeFailed("malformed document".to_string()))
        }
    }

    #[test]
    fn test_canvas_background_follows_theme() {
        let preview = RenderedPreview::render(&PostForm::with_theme(PostTheme::Dark).to_draft());
        let image = tier()
            .rasterize(&preview, &RasterRequest::new(500.0, 200.0, 2.0))
            .unwrap();

        assert_eq!(image.dimensions(), (1000, 400));
        // Top right corner is outside every text line
        assert_eq!(image.get_pixel(999, 0), &Rgba([0x15, 0x20, 0x2b, 255]));
    }

    #[test]
    fn test_canvas_draws_title_text() {
        let preview = RenderedPreview::default();
        let image = tier()
            .rasterize(&preview, &RasterRequest::new(500.0, 200.0, 2.0))
            .unwrap();

        // Title band (baseline 50pt at 2x) holds darker-than-white pixels
        let inked = (70..100)
            .flat_map(|y| (40..400).map(move |x| (x, y)))
            .any(|(x, y)| image.get_pixel(x, y)[0] < 200);
        assert!(inked);
    }

    #[test]
    fn test_canvas_fits_tall_post_at_max_scale() {
        let mut form = PostForm::default();
        form.set_post_text(&"\n".repeat(MAX_POST_CHARS));
        let preview = RenderedPreview::render(&form.to_draft());
        let request = RasterRequest::for_preview(&preview, ExportSettings::MAX_SCALE);
        assert!(request.pixel_height() > MAX_CANVAS_SIDE);

        let image = tier().rasterize(&preview, &request).unwrap();
        let (width, height) = image.dimensions();
        assert!(height <= MAX_CANVAS_SIDE);
        assert!(height > MAX_CANVAS_SIDE - 2);
        // Same aspect ratio as the card
        let expected = request.width / request.height;
        assert!((width as f32 / height as f32 - expected).abs() < 0.01);
    }

    #[test]
    fn test_canvas_keeps_scale_when_it_fits() {
        let request = RasterRequest::new(500.0, 200.0, 3.0);
        assert_eq!(CanvasTier::fitted(&request), request);
    }

    #[test]
    fn test_canvas_without_fonts_still_renders() {
        let tier = CanvasTier::new(false, None);
        let preview = RenderedPreview::render(&PostForm::with_theme(PostTheme::Dark).to_draft());
        let image = tier
            .rasterize(&preview, &RasterRequest::new(100.0, 50.0, 1.0))
            .unwrap();
        assert_eq!(image.dimensions(), (100, 50));
        assert!(image.pixels().all(|p| *p == Rgba([0x15, 0x20, 0x2b, 255])));
    }

    #[test]
    fn test_stats_summary_uses_formatted_counts() {
        let mut form = PostForm::default();
        form.apply_preset(Preset::Viral);
        let preview = RenderedPreview::render(&form.to_draft());
        assert_eq!(
            stats_summary(&preview),
            "890 replies • 3.2K retweets • 15.4K likes"
        );
    }

    #[test]
    fn test_last_tier_guarantees_png() {
        let canvas = tier();
        let pipeline = ExportPipeline::new()
            .with_tier(LibraryTier::new(None))
            .with_tier(BrokenVector)
            .with_tier(&canvas);

        let preview = RenderedPreview::default();
        let request = RasterRequest::for_preview(&preview, 2.0);
        let artifact = pipeline.run(&preview, &request).unwrap();

        assert_eq!(artifact.tier, TierKind::Canvas);
        assert!(!artifact.png.is_empty());
        assert!(artifact.png.starts_with(b"\x89PNG"));
    }

    #[test]
    fn test_blend_respects_coverage() {
        let white = Rgba([255, 255, 255, 255]);
        assert_eq!(blend(white, Color::rgba(0, 0, 0, 255), 255), Rgba([0, 0, 0, 255]));
        let half = blend(white, Color::rgba(0, 0, 0, 128), 128);
        assert!(half[0] > 100 && half[0] < 150);
        assert_eq!(half[3], 255);
    }
}
