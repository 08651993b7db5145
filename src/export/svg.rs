//! Vector reconstruction tier
//!
//! Rebuilds the post card as a standalone SVG document from the rendered
//! preview, then rasterizes it with `resvg`. Layout uses fixed offsets in
//! card points; colours come from [`PostPalette`]. Every piece of user text
//! passes through [`escape_xml`] before it is embedded.

use std::fmt::Write as _;
use std::sync::Arc;

use image::{Rgba, RgbaImage};
use log::debug;
use resvg::tiny_skia;
use resvg::usvg::{self, fontdb};

use super::pipeline::{ExportTier, RasterRequest, TierError, TierKind, BODY_LINE_HEIGHT, BODY_TOP};
use crate::format::escape_xml;
use crate::preview::RenderedPreview;
use crate::theme::{PostPalette, AVATAR_GRADIENT_END, AVATAR_GRADIENT_START, BADGE_BLUE};

/// Font stack used for all card text.
pub const FONT_STACK: &str = "TwitterChirp, -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Helvetica, Arial, sans-serif";

// Stats row icons, 24x24 viewBox
pub(crate) const REPLY_ICON: &[&str] = &["M1.751 10c0-4.42 3.584-8 8.005-8h4.366c4.49 0 8.129 3.64 8.129 8.13 0 2.96-1.607 5.68-4.196 7.11l-8.054 4.46v-3.69h-.067c-4.49.1-8.183-3.51-8.183-8.01zm8.005-6c-3.317 0-6.005 2.69-6.005 6 0 3.37 2.77 6.08 6.138 6.01l.351-.01h1.761v2.3l5.087-2.81c1.951-1.08 3.163-3.13 3.163-5.36 0-3.39-2.744-6.13-6.129-6.13H9.756z"];
pub(crate) const RETWEET_ICON: &[&str] = &["M4.5 3.88l4.432 4.14-1.364 1.46L5.5 7.55V16c0 1.1.896 2 2 2H13v2H7.5c-2.209 0-4-1.79-4-4V7.55L1.432 9.48.068 8.02 4.5 3.88zM16.5 6H11V4h5.5c2.209 0 4 1.79 4 4v8.45l2.068-1.93 1.364 1.46-4.432 4.14-4.432-4.14 1.364-1.46 2.068 1.93V8c0-1.1-.896-2-2-2z"];
pub(crate) const LIKE_ICON: &[&str] = &["M16.697 5.5c-1.222-.06-2.679.51-3.89 2.16l-.805 1.09-.806-1.09C9.984 6.01 8.526 5.44 7.304 5.5c-1.243.07-2.349.78-2.91 1.91-.552 1.12-.633 2.78.479 4.82 1.074 1.97 3.257 4.27 7.129 6.61 3.87-2.34 6.052-4.64 7.126-6.61 1.111-2.04 1.03-3.7.477-4.82-.561-1.13-1.666-1.84-2.908-1.91zm4.187 7.69c-1.351 2.48-4.001 5.12-8.379 7.67l-.503.3-.504-.3c-4.379-2.55-7.029-5.19-8.382-7.67-1.36-2.5-1.41-4.86-.514-6.67.887-1.79 2.647-2.91 4.601-3.01 1.651-.09 3.368.56 4.798 2.01 1.429-1.45 3.146-2.1 4.796-2.01 1.954.1 3.714 1.22 4.601 3.01.896 1.81.846 4.17-.514 6.67z"];
pub(crate) const SHARE_ICON: &[&str] = &[
    "M12 2.59l5.7 5.7-1.41 1.42L13 6.41V16h-2V6.41l-3.3 3.3-1.41-1.42L12 2.59z",
    "M21 15l-.02 3.51c0 1.38-1.12 2.49-2.5 2.49H5.5C4.11 21 3 19.88 3 18.5V15h2v3.5c0 .28.22.5.5.5h12.98c.28 0 .5-.22.5-.5L19 15h2z",
];

/// Stats row entries in display order: x offset, icon, value.
fn stat_items(preview: &RenderedPreview) -> [(f32, &'static [&'static str], Option<&str>); 4] {
    [
        (20.0, REPLY_ICON, Some(preview.replies.as_str())),
        (120.0, RETWEET_ICON, Some(preview.retweets.as_str())),
        (220.0, LIKE_ICON, Some(preview.likes.as_str())),
        (320.0, SHARE_ICON, None),
    ]
}

// ─────────────────────────────────────────────────────────────────────────────
// SVG Generation
// ─────────────────────────────────────────────────────────────────────────────

/// Build the SVG document for a card of `width` x `height` points.
pub fn build_post_svg(preview: &RenderedPreview, width: f32, height: f32) -> String {
    let palette = PostPalette::for_theme(preview.theme);
    let text = palette.text.to_hex();
    let secondary = palette.secondary.to_hex();

    let mut svg = String::with_capacity(4096);

    let _ = write!(
        svg,
        r#"<svg width="{w}" height="{h}" viewBox="0 0 {w} {h}" xmlns="http://www.w3.org/2000/svg">
<defs>
<linearGradient id="avatarGradient" x1="0%" y1="0%" x2="100%" y2="100%">
<stop offset="0%" stop-color="{g0}"/>
<stop offset="100%" stop-color="{g1}"/>
</linearGradient>
</defs>
<rect width="{w}" height="{h}" rx="16" fill="{bg}"/>
"#,
        w = width,
        h = height,
        g0 = AVATAR_GRADIENT_START.to_hex(),
        g1 = AVATAR_GRADIENT_END.to_hex(),
        bg = palette.background.to_hex(),
    );

    // Avatar
    let _ = writeln!(
        svg,
        r##"<circle cx="44" cy="44" r="24" fill="url(#avatarGradient)"/>
<text x="44" y="44" text-anchor="middle" dominant-baseline="central" font-family="{font}" font-weight="bold" font-size="16" fill="#ffffff">{initials}</text>"##,
        font = escape_xml(FONT_STACK),
        initials = escape_xml(preview.avatar.initials()),
    );

    // Name and verified badge
    let _ = writeln!(
        svg,
        r#"<text x="80" y="35" font-family="{font}" font-weight="bold" font-size="15" fill="{text}">{name}</text>"#,
        font = escape_xml(FONT_STACK),
        name = escape_xml(&preview.display_name),
    );
    if preview.verified_badge_visible {
        let cx = badge_x(&preview.display_name);
        let _ = writeln!(
            svg,
            r##"<circle cx="{cx}" cy="35" r="8" fill="{badge}"/>
<path d="M{x0} 35 l2.5 2.5 l4.5 -5" fill="none" stroke="#ffffff" stroke-width="1.8" stroke-linecap="round" stroke-linejoin="round"/>"##,
            cx = cx,
            badge = BADGE_BLUE.to_hex(),
            x0 = cx - 3.5,
        );
    }

    // Handle and time
    let _ = writeln!(
        svg,
        r#"<text x="80" y="52" font-family="{font}" font-size="15" fill="{secondary}">{line}</text>"#,
        font = escape_xml(FONT_STACK),
        line = escape_xml(&preview.handle_line()),
    );

    // Body
    for (i, line) in preview.body_lines().enumerate() {
        let _ = writeln!(
            svg,
            r#"<text x="20" y="{y}" xml:space="preserve" font-family="{font}" font-size="15" fill="{text}">{line}</text>"#,
            y = BODY_TOP + i as f32 * BODY_LINE_HEIGHT,
            font = escape_xml(FONT_STACK),
            line = escape_xml(line),
        );
    }

    // Divider and stats row
    let _ = writeln!(
        svg,
        r#"<line x1="20" y1="{y}" x2="{x2}" y2="{y}" stroke="{divider}" stroke-width="1"/>"#,
        y = height - 50.0,
        x2 = width - 20.0,
        divider = palette.divider.to_hex(),
    );

    for (x, icon, value) in stat_items(preview) {
        let _ = writeln!(svg, r#"<g transform="translate({}, {})">"#, x, height - 35.0);
        let _ = write!(
            svg,
            r#"<g transform="scale({})" fill="{}">"#,
            20.0 / 24.0,
            secondary
        );
        for d in icon {
            let _ = write!(svg, r#"<path d="{}"/>"#, d);
        }
        svg.push_str("</g>\n");
        if let Some(value) = value {
            let _ = writeln!(
                svg,
                r#"<text x="25" y="15" font-family="{font}" font-size="13" fill="{secondary}">{value}</text>"#,
                font = escape_xml(FONT_STACK),
                value = escape_xml(value),
            );
        }
        svg.push_str("</g>\n");
    }

    svg.push_str("</svg>\n");
    svg
}

/// Horizontal centre of the verified badge, estimated from the name length.
pub fn badge_x(display_name: &str) -> f32 {
    85.0 + display_name.chars().count() as f32 * 8.0
}

// ─────────────────────────────────────────────────────────────────────────────
// Fonts
// ─────────────────────────────────────────────────────────────────────────────

/// Build the font database used to render SVG text.
///
/// System fonts are loaded first. `bundled` (the font shipped inside egui)
/// is always added, and becomes the `sans-serif` family when the system has
/// no fonts of its own.
pub fn font_database(load_system: bool, bundled: Option<&[u8]>) -> Arc<fontdb::Database> {
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
                debug!("Using bundled font '{}' as sans-serif", family);
                db.set_sans_serif_family(family);
            }
        }
    }

    Arc::new(db)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tier
// ─────────────────────────────────────────────────────────────────────────────

/// Tier 2: rasterize the reconstructed SVG.
pub struct VectorTier {
    fontdb: Arc<fontdb::Database>,
}

impl VectorTier {
    pub fn new(fontdb: Arc<fontdb::Database>) -> Self {
        Self { fontdb }
    }

    /// Rasterize an SVG document at `scale`.
    pub fn rasterize_svg(&self, svg: &str, scale: f32) -> Result<RgbaImage, TierError> {
        let mut options = usvg::Options::default();
        options.fontdb = Arc::clone(&self.fontdb);

        let tree = usvg::Tree::from_str(svg, &options)
            .map_err(|e| TierError::ImageDecodeFailed(e.to_string()))?;

        let size = tree.size();
        let width = (size.width() * scale).round().max(1.0) as u32;
        let height = (size.height() * scale).round().max(1.0) as u32;

        let mut pixmap = tiny_skia::Pixmap::new(width, height).ok_or_else(|| {
            TierError::ImageDecodeFailed(format!("cannot allocate {}x{} pixmap", width, height))
        })?;
        resvg::render(
            &tree,
            tiny_skia::Transform::from_scale(scale, scale),
            &mut pixmap.as_mut(),
        );

        Ok(pixmap_to_image(&pixmap))
    }
}

impl ExportTier for VectorTier {
    fn kind(&self) -> TierKind {
        TierKind::Vector
    }

    fn rasterize(
        &self,
        preview: &RenderedPreview,
        request: &RasterRequest,
    ) -> Result<RgbaImage, TierError> {
        let svg = build_post_svg(preview, request.width, request.height);
        self.rasterize_svg(&svg, request.scale)
    }
}

/// Convert premultiplied pixmap data to straight-alpha RGBA.
fn pixmap_to_image(pixmap: &tiny_skia::Pixmap) -> RgbaImage {
    let mut image = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in image.pixels_mut().zip(pixmap.pixels()) {
        let color = src.demultiply();
        *dst = Rgba([color.red(), color.green(), color.blue(), color.alpha()]);
    }
    image
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::{PostForm, PostTheme, Preset};

    fn preview_from(form: &PostForm) -> RenderedPreview {
        RenderedPreview::render(&form.to_draft())
    }

    fn empty_fonts() -> Arc<fontdb::Database> {
        font_database(false, None)
    }

    /// Text content between tags, outside of markup.
    fn text_nodes(svg: &str) -> Vec<&str> {
        svg.split('>')
            .filter_map(|chunk| chunk.split('<').next())
            .filter(|text| !text.trim().is_empty())
            .collect()
    }

    #[test]
    fn test_svg_contains_preview_text() {
        let mut form = PostForm::default();
        form.apply_preset(Preset::Viral);
        let svg = build_post_svg(&preview_from(&form), 500.0, 300.0);

        assert!(svg.contains(">Tech Guru</text>"));
        assert!(svg.contains("@techguru · 3h"));
        assert!(svg.contains(">15.4K</text>"));
        assert!(svg.contains(">3.2K</text>"));
        assert!(svg.contains(">890</text>"));
        assert!(svg.contains(">TG</text>"));
    }

    #[test]
    fn test_svg_body_lines_use_fixed_line_height() {
        let form = PostForm {
            post_text: "first\nsecond\nthird".to_string(),
            ..PostForm::default()
        };
        let svg = build_post_svg(&preview_from(&form), 500.0, 300.0);
        assert!(svg.contains(r#"<text x="20" y="90""#));
        assert!(svg.contains(r#"<text x="20" y="110""#));
        assert!(svg.contains(r#"<text x="20" y="130""#));
    }

    #[test]
    fn test_svg_escapes_all_user_text() {
        let hostile = "<script>&\"'</script>";
        let form = PostForm {
            display_name: hostile.to_string(),
            username: hostile.to_string(),
            post_text: format!("{}\n{}", hostile, hostile),
            time_stamp: hostile.to_string(),
            verified: true,
            ..PostForm::default()
        };
        let svg = build_post_svg(&preview_from(&form), 500.0, 300.0);

        assert!(!svg.contains("<script>"));
        for text in text_nodes(&svg) {
            assert!(!text.contains('<'), "unescaped text node: {}", text);
            assert!(!text.contains('"'), "unescaped text node: {}", text);
            assert!(!text.contains('\''), "unescaped text node: {}", text);
            let stripped = text
                .replace("&amp;", "")
                .replace("&lt;", "")
                .replace("&gt;", "")
                .replace("&quot;", "")
                .replace("&apos;", "");
            assert!(!stripped.contains('&'), "bare ampersand in: {}", text);
        }

        // Well-formed: usvg accepts it
        let options = usvg::Options::default();
        assert!(usvg::Tree::from_str(&svg, &options).is_ok());
    }

    #[test]
    fn test_svg_verified_badge_only_when_visible() {
        let mut form = PostForm::default();
        let without = build_post_svg(&preview_from(&form), 500.0, 200.0);
        form.verified = true;
        let with = build_post_svg(&preview_from(&form), 500.0, 200.0);

        let badge = BADGE_BLUE.to_hex();
        assert!(!without.contains(&badge));
        assert!(with.contains(&badge));
    }

    #[test]
    fn test_svg_theme_palettes() {
        let mut form = PostForm::with_theme(PostTheme::Dark);
        let dark = build_post_svg(&preview_from(&form), 500.0, 200.0);
        assert!(dark.contains("#15202b"));
        assert!(dark.contains("#2f3336"));

        form.theme = PostTheme::Light;
        let light = build_post_svg(&preview_from(&form), 500.0, 200.0);
        assert!(light.contains(r##"fill="#ffffff""##));
        assert!(light.contains("#ebeef0"));
        assert!(!light.contains("#15202b"));
    }

    #[test]
    fn test_svg_stats_row_positions() {
        let svg = build_post_svg(&RenderedPreview::default(), 500.0, 200.0);
        for x in ["20", "120", "220", "320"] {
            assert!(svg.contains(&format!(r#"<g transform="translate({}, 165)">"#, x)));
        }
        assert!(svg.contains(r#"y1="150""#));
    }

    #[test]
    fn test_badge_x_from_name_length() {
        assert_eq!(badge_x("Tech Guru"), 85.0 + 9.0 * 8.0);
    }

    #[test]
    fn test_vector_tier_renders_at_scale() {
        let tier = VectorTier::new(empty_fonts());
        let preview = RenderedPreview::render(&PostForm::with_theme(PostTheme::Dark).to_draft());
        let request = RasterRequest::new(500.0, 200.0, 2.0);
        let image = tier.rasterize(&preview, &request).unwrap();

        assert_eq!(image.dimensions(), (1000, 400));
        // Inside the card: dark background
        assert_eq!(image.get_pixel(500, 200), &Rgba([0x15, 0x20, 0x2b, 255]));
        // Outside the rounded corner: transparent
        assert_eq!(image.get_pixel(0, 0)[3], 0);
    }

    #[test]
    fn test_vector_tier_renders_verified_badge() {
        let form = PostForm {
            display_name: "Tech Guru".to_string(),
            verified: true,
            ..PostForm::with_theme(PostTheme::Dark)
        };
        let preview = preview_from(&form);
        let svg = build_post_svg(&preview, 500.0, 200.0);
        assert!(svg.contains(r##"stroke="#ffffff""##));

        let tier = VectorTier::new(empty_fonts());
        let image = tier
            .rasterize(&preview, &RasterRequest::new(500.0, 200.0, 2.0))
            .unwrap();

        // Lower half of the badge circle, clear of the check mark
        let x = (badge_x("Tech Guru") * 2.0) as u32;
        assert_eq!(image.get_pixel(x, 82), &BADGE_BLUE.to_rgba());
        // The avatar circle is drawn as well
        assert_ne!(image.get_pixel(88, 88), &Rgba([0x15, 0x20, 0x2b, 255]));
    }

    #[test]
    fn test_vector_tier_decode_failure() {
        let tier = VectorTier::new(empty_fonts());
        let result = tier.rasterize_svg("<svg", 2.0);
        assert!(matches!(result, Err(TierError::ImageDecodeFailed(_))));
    }
}
