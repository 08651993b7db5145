//! Settings Panel Component for Viral Post
//!
//! This module implements a modal settings panel for the application theme,
//! the default card theme and the export options, with live preview.

use crate::config::{ExportSettings, Settings, Theme};
use crate::draft::PostTheme;
use eframe::egui::{self, Color32, RichText, Ui};

/// Settings panel sections for navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SettingsSection {
    #[default]
    Appearance,
    Export,
}

impl SettingsSection {
    /// Get the display label for the section.
    pub fn label(&self) -> &'static str {
        match self {
            SettingsSection::Appearance => "Appearance",
            SettingsSection::Export => "Export",
        }
    }

    /// Get the icon for the section.
    pub fn icon(&self) -> &'static str {
        match self {
            SettingsSection::Appearance => "🎨",
            SettingsSection::Export => "📤",
        }
    }
}

/// Result of showing the settings panel.
#[derive(Debug, Clone, Default)]
pub struct SettingsPanelOutput {
    /// Whether settings were modified.
    pub changed: bool,
    /// Whether the panel should be closed.
    pub close_requested: bool,
    /// Whether a reset to defaults was requested.
    pub reset_requested: bool,
    /// Whether the export folder picker should be opened.
    pub browse_export_dir: bool,
}

/// Settings panel state and rendering.
#[derive(Debug, Clone, Default)]
pub struct SettingsPanel {
    /// Currently active settings section.
    active_section: SettingsSection,
}

impl SettingsPanel {
    /// Create a new settings panel instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Show the settings panel as a modal window.
    ///
    /// Edits are applied to `settings` immediately; the caller persists them
    /// when `changed` is set.
    pub fn show(
        &mut self,
        ctx: &egui::Context,
        settings: &mut Settings,
        is_dark: bool,
    ) -> SettingsPanelOutput {
        let mut output = SettingsPanelOutput::default();

        // Semi-transparent overlay
        let screen_rect = ctx.screen_rect();
        let overlay_color = if is_dark {
            Color32::from_rgba_unmultiplied(0, 0, 0, 180)
        } else {
            Color32::from_rgba_unmultiplied(0, 0, 0, 120)
        };

        egui::Area::new(egui::Id::new("settings_overlay"))
            .order(egui::Order::Middle)
            .fixed_pos(screen_rect.min)
            .show(ctx, |ui| {
                let response = ui.allocate_response(screen_rect.size(), egui::Sense::click());
                ui.painter().rect_filled(screen_rect, 0.0, overlay_color);

                if response.clicked() {
                    output.close_requested = true;
                }
            });

        egui::Window::new("⚙ Settings")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .min_width(480.0)
            .max_width(560.0)
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
                    output.close_requested = true;
                }

                ui.horizontal(|ui| {
                    ui.vertical(|ui| {
                        ui.set_min_width(120.0);

                        for section in [SettingsSection::Appearance, SettingsSection::Export] {
                            let selected = self.active_section == section;
                            let text = format!("{} {}", section.icon(), section.label());

                            let btn = ui.add_sized(
                                [110.0, 32.0],
                                egui::SelectableLabel::new(
                                    selected,
                                    RichText::new(text).size(14.0),
                                ),
                            );

                            if btn.clicked() {
                                self.active_section = section;
                            }
                        }

                        ui.add_space(ui.available_height() - 40.0);

                        if ui
                            .add_sized([110.0, 28.0], egui::Button::new("↺ Reset All"))
                            .on_hover_text("Reset all settings to defaults")
                            .clicked()
                        {
                            output.reset_requested = true;
                        }
                    });

                    ui.separator();

                    ui.vertical(|ui| {
                        ui.set_min_width(330.0);
                        ui.set_min_height(300.0);

                        let changed = match self.active_section {
                            SettingsSection::Appearance => show_appearance_section(ui, settings),
                            SettingsSection::Export => {
                                show_export_section(ui, &mut settings.export, &mut output)
                            }
                        };
                        output.changed |= changed;
                    });
                });

                ui.separator();

                ui.horizontal(|ui| {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Close").clicked() {
                            output.close_requested = true;
                        }
                        ui.label(
                            RichText::new("Settings are saved automatically")
                                .small()
                                .weak(),
                        );
                    });
                });
            });

        output
    }
}

/// Show the Appearance settings section.
///
/// Returns true if any setting was changed.
fn show_appearance_section(ui: &mut Ui, settings: &mut Settings) -> bool {
    let mut changed = false;

    ui.heading("Appearance");
    ui.add_space(8.0);

    ui.label(RichText::new("Application Theme").strong());
    ui.add_space(4.0);

    ui.horizontal(|ui| {
        for theme in Theme::all() {
            let label = match theme {
                Theme::Light => "☀ Light",
                Theme::Dark => "🌙 Dark",
                Theme::System => "💻 System",
            };
            changed |= ui
                .selectable_value(&mut settings.theme, *theme, label)
                .changed();
        }
    });

    ui.add_space(16.0);
    ui.separator();
    ui.add_space(8.0);

    ui.label(RichText::new("Default Post Theme").strong());
    ui.label(
        RichText::new("Card theme a new post starts with")
            .weak()
            .small(),
    );
    ui.add_space(4.0);

    ui.horizontal(|ui| {
        for theme in PostTheme::all() {
            changed |= ui
                .selectable_value(&mut settings.default_post_theme, *theme, theme.label())
                .changed();
        }
    });

    changed
}

/// Show the Export settings section.
///
/// Returns true if any setting was changed.
fn show_export_section(
    ui: &mut Ui,
    export: &mut ExportSettings,
    output: &mut SettingsPanelOutput,
) -> bool {
    let mut changed = false;

    ui.heading("Export");
    ui.add_space(8.0);

    // Image scale
    ui.horizontal(|ui| {
        ui.label(RichText::new("Image Scale").strong());
        ui.add_space(8.0);
        ui.label(format!("{}x", export.scale));
    });
    ui.add_space(4.0);

    changed |= ui
        .add(
            egui::Slider::new(
                &mut export.scale,
                ExportSettings::MIN_SCALE..=ExportSettings::MAX_SCALE,
            )
            .show_value(false)
            .step_by(0.5),
        )
        .changed();

    ui.add_space(8.0);

    changed |= ui
        .checkbox(&mut export.capture_preview, "Capture the on-screen preview")
        .on_hover_text("Crop the card out of a window screenshot before rebuilding it as SVG")
        .changed();

    ui.add_enabled_ui(export.capture_preview, |ui| {
        ui.horizontal(|ui| {
            ui.label("Wait for screenshot:");
            ui.label(format!("{} frames", export.capture_frame_budget));
        });
        changed |= ui
            .add(
                egui::Slider::new(
                    &mut export.capture_frame_budget,
                    1..=ExportSettings::MAX_FRAME_BUDGET,
                )
                .show_value(false),
            )
            .changed();
    });

    ui.add_space(16.0);
    ui.separator();
    ui.add_space(8.0);

    // Download location
    ui.label(RichText::new("Download Folder").strong());
    ui.add_space(4.0);

    let location = export
        .export_directory
        .as_ref()
        .map(|dir| dir.display().to_string())
        .unwrap_or_else(|| "System downloads folder".to_string());
    ui.label(RichText::new(location).small().weak());

    ui.horizontal(|ui| {
        if ui.button("Browse…").clicked() {
            output.browse_export_dir = true;
        }
        if export.export_directory.is_some() && ui.button("Use Default").clicked() {
            export.export_directory = None;
            changed = true;
        }
    });

    ui.add_space(4.0);

    changed |= ui
        .checkbox(&mut export.open_after_export, "Open image after download")
        .changed();

    ui.add_space(16.0);
    ui.separator();
    ui.add_space(8.0);

    // Print delay
    ui.horizontal(|ui| {
        ui.label(RichText::new("Print Dialog Delay").strong());
        ui.add_space(8.0);
        ui.label(format!("{} ms", export.print_delay_ms));
    });
    ui.add_space(4.0);

    changed |= ui
        .add(
            egui::Slider::new(
                &mut export.print_delay_ms,
                0..=ExportSettings::MAX_PRINT_DELAY_MS,
            )
            .show_value(false)
            .step_by(100.0),
        )
        .changed();

    changed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_panel_new() {
        let panel = SettingsPanel::new();
        assert_eq!(panel.active_section, SettingsSection::Appearance);
    }

    #[test]
    fn test_settings_section_label() {
        assert_eq!(SettingsSection::Appearance.label(), "Appearance");
        assert_eq!(SettingsSection::Export.label(), "Export");
    }

    #[test]
    fn test_settings_section_icon() {
        assert_eq!(SettingsSection::Appearance.icon(), "🎨");
        assert_eq!(SettingsSection::Export.icon(), "📤");
    }

    #[test]
    fn test_settings_panel_output_default() {
        let output = SettingsPanelOutput::default();
        assert!(!output.changed);
        assert!(!output.close_requested);
        assert!(!output.reset_requested);
        assert!(!output.browse_export_dir);
    }
}
