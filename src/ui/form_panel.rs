//! Post form panel
//!
//! One input per field of [`PostForm`], plus the preset buttons. The panel
//! only edits the form; the caller re-renders the preview when `changed` is
//! reported.

use eframe::egui::{self, Color32, RichText, TextEdit, Ui};

use crate::draft::{PostForm, PostTheme, Preset};
use crate::format::MAX_POST_CHARS;
use crate::preview::RenderedPreview;

/// Result of showing the form panel.
#[derive(Debug, Clone, Default)]
pub struct FormPanelOutput {
    /// Whether any form field was edited
    pub changed: bool,
    /// Preset the user asked to load
    pub preset: Option<Preset>,
    /// Whether the avatar file picker should be opened
    pub browse_avatar: bool,
}

/// Parse one of the counter colour constants.
pub fn counter_color(hex: &str) -> Color32 {
    Color32::from_hex(hex).unwrap_or(Color32::GRAY)
}

fn field_label(ui: &mut Ui, text: &str) {
    ui.add_space(6.0);
    ui.label(RichText::new(text).strong());
}

/// Show the form and return what the user did.
pub fn show(ui: &mut Ui, form: &mut PostForm, preview: &RenderedPreview) -> FormPanelOutput {
    let mut output = FormPanelOutput::default();
    let mut changed = false;

    ui.heading("Post Details");
    ui.add_space(4.0);

    // Presets
    ui.horizontal(|ui| {
        ui.label("Presets:");
        for preset in Preset::all() {
            if ui.button(preset.label()).clicked() {
                output.preset = Some(*preset);
            }
        }
    });

    field_label(ui, "Display Name");
    changed |= ui
        .add(TextEdit::singleline(&mut form.display_name).hint_text("Anonymous"))
        .changed();

    field_label(ui, "Username");
    ui.horizontal(|ui| {
        ui.label("@");
        changed |= ui
            .add(TextEdit::singleline(&mut form.username).hint_text("anonymous"))
            .changed();
    });

    field_label(ui, "Post Text");
    changed |= ui
        .add(
            TextEdit::multiline(&mut form.post_text)
                .hint_text("What's happening?")
                .char_limit(MAX_POST_CHARS)
                .desired_rows(5)
                .desired_width(f32::INFINITY),
        )
        .changed();
    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
        ui.label(
            RichText::new(preview.char_counter_label())
                .small()
                .color(counter_color(preview.char_counter_color())),
        );
    });

    field_label(ui, "Engagement");
    egui::Grid::new("engagement_grid")
        .num_columns(2)
        .spacing([8.0, 4.0])
        .show(ui, |ui| {
            for (label, value) in [
                ("Likes", &mut form.likes),
                ("Retweets", &mut form.retweets),
                ("Replies", &mut form.replies),
            ] {
                ui.label(label);
                changed |= ui
                    .add(TextEdit::singleline(value).desired_width(120.0))
                    .changed();
                ui.end_row();
            }
        });

    field_label(ui, "Time");
    changed |= ui
        .add(TextEdit::singleline(&mut form.time_stamp).hint_text("1m"))
        .changed();

    field_label(ui, "Avatar");
    ui.horizontal(|ui| {
        changed |= ui
            .add(
                TextEdit::singleline(&mut form.avatar_url)
                    .hint_text("Image path (optional)")
                    .desired_width(220.0),
            )
            .changed();
        if ui.button("Browse…").clicked() {
            output.browse_avatar = true;
        }
        if !form.avatar_url.is_empty() && ui.small_button("✕").on_hover_text("Use initials").clicked() {
            form.avatar_url.clear();
            changed = true;
        }
    });

    ui.add_space(6.0);
    changed |= ui.checkbox(&mut form.verified, "Verified account").changed();

    field_label(ui, "Post Theme");
    ui.horizontal(|ui| {
        for theme in PostTheme::all() {
            changed |= ui
                .radio_value(&mut form.theme, *theme, theme.label())
                .changed();
        }
    });

    output.changed = changed;
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preview::{COUNTER_COLOR_OK, COUNTER_COLOR_OVER};

    #[test]
    fn test_counter_colors_parse() {
        assert_eq!(counter_color(COUNTER_COLOR_OK), Color32::from_rgb(0x65, 0x77, 0x86));
        assert_eq!(counter_color(COUNTER_COLOR_OVER), Color32::from_rgb(0xff, 0x6b, 0x6b));
    }

    #[test]
    fn test_counter_color_invalid_falls_back() {
        assert_eq!(counter_color("nope"), Color32::GRAY);
    }

    #[test]
    fn test_form_output_default() {
        let output = FormPanelOutput::default();
        assert!(!output.changed);
        assert!(output.preset.is_none());
        assert!(!output.browse_avatar);
    }
}
