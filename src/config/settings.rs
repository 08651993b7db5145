//! User settings and preferences for Viral Post
//!
//! This module defines the `Settings` struct that holds all user-configurable
//! options, with serde support for JSON persistence. The post being edited is
//! never part of the settings.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::draft::PostTheme;
use crate::export::pipeline::DEFAULT_EXPORT_SCALE;
use crate::export::print::DEFAULT_PRINT_DELAY_MS;

// ─────────────────────────────────────────────────────────────────────────────
// Theme Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Color theme of the application chrome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    System,
}

impl Theme {
    /// Get a display label for the theme.
    pub fn label(&self) -> &'static str {
        match self {
            Theme::Light => "Light",
            Theme::Dark => "Dark",
            Theme::System => "System",
        }
    }

    /// Get all available themes.
    pub fn all() -> &'static [Theme] {
        &[Theme::Light, Theme::Dark, Theme::System]
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Window Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Window dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowSize {
    /// Window width in points
    pub width: f32,
    /// Window height in points
    pub height: f32,
    /// Whether the window was maximized
    #[serde(default)]
    pub maximized: bool,
}

impl Default for WindowSize {
    fn default() -> Self {
        Self {
            width: 1100.0,
            height: 760.0,
            maximized: false,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Export Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Options for the export pipeline and its sinks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Device scale of exported images
    pub scale: f32,

    /// Whether to try cropping a window screenshot before rebuilding the card
    pub capture_preview: bool,

    /// Frames to wait for a requested screenshot before giving up on it
    pub capture_frame_budget: u32,

    /// Where downloaded images go (None: platform download directory)
    pub export_directory: Option<PathBuf>,

    /// Whether to open the saved image after a download
    pub open_after_export: bool,

    /// Milliseconds between loading the print page and opening the print dialog
    pub print_delay_ms: u32,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            scale: DEFAULT_EXPORT_SCALE,
            capture_preview: true,
            capture_frame_budget: 10,
            export_directory: None,
            open_after_export: false,
            print_delay_ms: DEFAULT_PRINT_DELAY_MS,
        }
    }
}

impl ExportSettings {
    /// Minimum export scale.
    pub const MIN_SCALE: f32 = 1.0;
    /// Maximum export scale.
    pub const MAX_SCALE: f32 = 4.0;
    /// Maximum screenshot wait in frames.
    pub const MAX_FRAME_BUDGET: u32 = 120;
    /// Maximum print delay.
    pub const MAX_PRINT_DELAY_MS: u32 = 10_000;

    fn sanitize(&mut self) {
        self.scale = if self.scale.is_finite() {
            self.scale.clamp(Self::MIN_SCALE, Self::MAX_SCALE)
        } else {
            DEFAULT_EXPORT_SCALE
        };

        self.capture_frame_budget = self.capture_frame_budget.clamp(1, Self::MAX_FRAME_BUDGET);
        self.print_delay_ms = self.print_delay_ms.min(Self::MAX_PRINT_DELAY_MS);

        if self
            .export_directory
            .as_ref()
            .is_some_and(|dir| dir.as_os_str().is_empty())
        {
            self.export_directory = None;
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Main Settings Struct
// ─────────────────────────────────────────────────────────────────────────────

/// User preferences and application settings.
///
/// This struct is serialized to JSON and persisted to the user's config directory.
/// All fields have sensible defaults via the `Default` trait and `#[serde(default)]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    // ─────────────────────────────────────────────────────────────────────────
    // Appearance
    // ─────────────────────────────────────────────────────────────────────────
    /// Application color theme (light, dark, or system)
    pub theme: Theme,

    /// Card theme a fresh post starts with
    pub default_post_theme: PostTheme,

    // ─────────────────────────────────────────────────────────────────────────
    // Window State
    // ─────────────────────────────────────────────────────────────────────────
    /// Window size
    pub window_size: WindowSize,

    // ─────────────────────────────────────────────────────────────────────────
    // Export Settings
    // ─────────────────────────────────────────────────────────────────────────
    pub export: ExportSettings,
}

impl Settings {
    /// Minimum window dimension.
    pub const MIN_WINDOW_SIZE: f32 = 400.0;
    /// Maximum window dimension.
    pub const MAX_WINDOW_SIZE: f32 = 10000.0;

    /// Sanitize settings by clamping values to valid ranges.
    ///
    /// This is useful after loading settings from a file that might have
    /// been manually edited with invalid values.
    pub fn sanitize(&mut self) {
        self.window_size.width = self
            .window_size
            .width
            .clamp(Self::MIN_WINDOW_SIZE, Self::MAX_WINDOW_SIZE);
        self.window_size.height = self
            .window_size
            .height
            .clamp(Self::MIN_WINDOW_SIZE, Self::MAX_WINDOW_SIZE);

        self.export.sanitize();
    }

    /// Load settings and sanitize them to ensure validity.
    pub fn from_json_sanitized(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.theme, Theme::Light);
        assert_eq!(settings.default_post_theme, PostTheme::Light);
        assert_eq!(settings.export.scale, 2.0);
        assert!(settings.export.capture_preview);
        assert_eq!(settings.export.capture_frame_budget, 10);
        assert_eq!(settings.export.print_delay_ms, 500);
        assert_eq!(settings.export.export_directory, None);
    }

    #[test]
    fn test_theme_serialization() {
        assert_eq!(serde_json::to_string(&Theme::Light).unwrap(), "\"light\"");
        assert_eq!(serde_json::to_string(&Theme::Dark).unwrap(), "\"dark\"");
        assert_eq!(serde_json::to_string(&Theme::System).unwrap(), "\"system\"");
    }

    #[test]
    fn test_theme_deserialization() {
        let theme: Theme = serde_json::from_str("\"system\"").unwrap();
        assert_eq!(theme, Theme::System);
    }

    #[test]
    fn test_settings_serialization_roundtrip() {
        let mut settings = Settings::default();
        settings.theme = Theme::Dark;
        settings.export.export_directory = Some(PathBuf::from("/tmp/posts"));
        let json = serde_json::to_string(&settings).unwrap();
        let parsed: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(settings, parsed);
    }

    #[test]
    fn test_settings_deserialize_with_defaults() {
        let json = r#"{"theme": "dark", "export": {"scale": 3.0}}"#;
        let settings: Settings = serde_json::from_str(json).unwrap();

        assert_eq!(settings.theme, Theme::Dark);
        assert_eq!(settings.export.scale, 3.0);
        assert_eq!(settings.export.print_delay_ms, 500);
        assert_eq!(settings.window_size, WindowSize::default());
    }

    #[test]
    fn test_settings_deserialize_empty_json() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_sanitize_export_scale() {
        let mut settings = Settings::default();
        settings.export.scale = 0.1;
        settings.sanitize();
        assert_eq!(settings.export.scale, ExportSettings::MIN_SCALE);

        settings.export.scale = 12.0;
        settings.sanitize();
        assert_eq!(settings.export.scale, ExportSettings::MAX_SCALE);
    }

    #[test]
    fn test_sanitize_frame_budget_and_delay() {
        let mut settings = Settings::default();
        settings.export.capture_frame_budget = 0;
        settings.export.print_delay_ms = 999_999;
        settings.sanitize();
        assert_eq!(settings.export.capture_frame_budget, 1);
        assert_eq!(settings.export.print_delay_ms, ExportSettings::MAX_PRINT_DELAY_MS);
    }

    #[test]
    fn test_sanitize_empty_export_directory() {
        let mut settings = Settings::default();
        settings.export.export_directory = Some(PathBuf::new());
        settings.sanitize();
        assert_eq!(settings.export.export_directory, None);
    }

    #[test]
    fn test_sanitize_window_size() {
        let mut settings = Settings::default();
        settings.window_size.width = 10.0;
        settings.window_size.height = 50_000.0;
        settings.sanitize();
        assert_eq!(settings.window_size.width, Settings::MIN_WINDOW_SIZE);
        assert_eq!(settings.window_size.height, Settings::MAX_WINDOW_SIZE);
    }

    #[test]
    fn test_from_json_sanitized() {
        let json = r#"{"export": {"scale": 100.0}}"#;
        let settings = Settings::from_json_sanitized(json).unwrap();
        assert_eq!(settings.export.scale, ExportSettings::MAX_SCALE);
    }
}
