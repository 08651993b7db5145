//! Theme System for Viral Post
//!
//! Two separate concerns live here:
//!
//! - `PostPalette`: the fixed colours of the post card, keyed by
//!   [`PostTheme`]. The egui card, the SVG reconstruction, the canvas
//!   fallback and the print stylesheet all read from it so the exports
//!   match the live preview.
//! - `visuals`: egui `Visuals` for the application chrome (form panel,
//!   buttons), selected by the `Theme` setting.

pub mod visuals;

use crate::draft::PostTheme;
use egui::Color32;

// ─────────────────────────────────────────────────────────────────────────────
// Rgb
// ─────────────────────────────────────────────────────────────────────────────

/// An opaque sRGB colour usable by every rendering backend in the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(0xff, 0xff, 0xff);

    /// `#rrggbb` for SVG and CSS.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }

    pub fn to_color32(self) -> Color32 {
        Color32::from_rgb(self.0, self.1, self.2)
    }

    pub fn to_rgba(self) -> image::Rgba<u8> {
        image::Rgba([self.0, self.1, self.2, 0xff])
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Post Palette
// ─────────────────────────────────────────────────────────────────────────────

/// Colours of the post card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostPalette {
    /// Card background
    pub background: Rgb,
    /// Display name and body text
    pub text: Rgb,
    /// Handle, timestamp and stats
    pub secondary: Rgb,
    /// Divider above the stats row (and the light card border)
    pub divider: Rgb,
    /// Page background around the card in the print document
    pub page: Rgb,
}

/// Verified badge fill.
pub const BADGE_BLUE: Rgb = Rgb(0x1d, 0x9b, 0xf0);
/// Avatar gradient start.
pub const AVATAR_GRADIENT_START: Rgb = Rgb(0x1d, 0xa1, 0xf2);
/// Avatar gradient end.
pub const AVATAR_GRADIENT_END: Rgb = Rgb(0x19, 0x91, 0xdb);

impl PostPalette {
    pub fn light() -> Self {
        Self {
            background: Rgb(0xff, 0xff, 0xff),
            text: Rgb(0x0f, 0x14, 0x19),
            secondary: Rgb(0x53, 0x64, 0x71),
            divider: Rgb(0xeb, 0xee, 0xf0),
            page: Rgb(0xff, 0xff, 0xff),
        }
    }

    pub fn dark() -> Self {
        Self {
            background: Rgb(0x15, 0x20, 0x2b),
            text: Rgb(0xff, 0xff, 0xff),
            secondary: Rgb(0x71, 0x76, 0x7b),
            divider: Rgb(0x2f, 0x33, 0x36),
            page: Rgb(0x00, 0x00, 0x00),
        }
    }

    pub fn for_theme(theme: PostTheme) -> Self {
        match theme {
            PostTheme::Light => Self::light(),
            PostTheme::Dark => Self::dark(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
