//! Application chrome visuals
//!
//! Converts the `Theme` setting into egui `Visuals`. The accent colour is
//! the same blue as the verified badge so buttons and the card feel like
//! one product.

use eframe::egui::{self, Color32, Rounding, Stroke, Visuals};

use super::{PostPalette, BADGE_BLUE};
use crate::config::Theme;

/// Widget corner radius.
const WIDGET_ROUNDING: f32 = 6.0;

/// Create egui Visuals for the given theme setting.
///
/// `Theme::System` follows the `dark_mode` flag of the visuals egui
/// detected at startup.
pub fn visuals_for_theme(theme: Theme, system_visuals: &Visuals) -> Visuals {
    let dark = match theme {
        Theme::Light => false,
        Theme::Dark => true,
        Theme::System => system_visuals.dark_mode,
    };

    if dark {
        create_dark_visuals()
    } else {
        create_light_visuals()
    }
}

/// Apply the theme setting to an egui context.
pub fn apply_theme(ctx: &egui::Context, theme: Theme) {
    let visuals = visuals_for_theme(theme, &ctx.style().visuals);
    ctx.set_visuals(visuals);
    log::debug!("Applied application theme: {:?}", theme);
}

pub fn create_light_visuals() -> Visuals {
    let palette = PostPalette::light();
    let mut visuals = Visuals::light();

    visuals.panel_fill = Color32::from_rgb(247, 249, 249);
    visuals.window_fill = palette.background.to_color32();
    visuals.extreme_bg_color = palette.background.to_color32();
    visuals.hyperlink_color = BADGE_BLUE.to_color32();

    style_widgets(&mut visuals, palette);
    visuals.dark_mode = false;
    visuals
}

pub fn create_dark_visuals() -> Visuals {
    let palette = PostPalette::dark();
    let mut visuals = Visuals::dark();

    visuals.panel_fill = Color32::from_rgb(0, 0, 0);
    visuals.window_fill = palette.background.to_color32();
    visuals.extreme_bg_color = Color32::from_rgb(22, 24, 28);
    visuals.hyperlink_color = BADGE_BLUE.to_color32();

    style_widgets(&mut visuals, palette);
    visuals.dark_mode = true;
    visuals
}

fn style_widgets(visuals: &mut Visuals, palette: PostPalette) {
    let accent = BADGE_BLUE.to_color32();

    visuals.selection.bg_fill = accent.linear_multiply(0.35);
    visuals.selection.stroke = Stroke::new(1.0, accent);

    visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, palette.text.to_color32());
    visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, palette.divider.to_color32());
    visuals.widgets.inactive.bg_stroke = Stroke::new(1.0, palette.divider.to_color32());
    visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, palette.secondary.to_color32());
    visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, accent);
    visuals.widgets.active.bg_fill = accent;
    visuals.widgets.active.fg_stroke = Stroke::new(2.0, Color32::WHITE);

    for widget in [
        &mut visuals.widgets.noninteractive,
        &mut visuals.widgets.inactive,
        &mut visuals.widgets.hovered,
        &mut visuals.widgets.active,
        &mut visuals.widgets.open,
    ] {
        widget.rounding = Rounding::same(WIDGET_ROUNDING);
    }

    visuals.interact_cursor = Some(egui::CursorIcon::PointingHand);
}
