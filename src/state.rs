//! Application state for Viral Post
//!
//! `AppState` owns everything the UI mutates: the post form, the rendered
//! preview derived from it, the settings, toast messages and the busy state
//! of the two export buttons.

use log::{debug, info, warn};

use crate::config::{save_config_silent, Settings};
use crate::draft::{PostForm, Preset};
use crate::preview::RenderedPreview;

/// How long the copy button shows its confirmation, in seconds.
pub const COPIED_DISPLAY_SECS: f64 = 2.0;

// ─────────────────────────────────────────────────────────────────────────────
// Export Buttons
// ─────────────────────────────────────────────────────────────────────────────

/// Where a finished export goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportSink {
    Download,
    Clipboard,
}

/// Lifecycle of an export button.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ButtonPhase {
    #[default]
    Idle,
    /// An export for this button is running
    Busy,
    /// Showing a confirmation until the given app time
    Done { until: f64 },
}

/// An export button: its sink plus its current phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionButton {
    pub sink: ExportSink,
    pub phase: ButtonPhase,
}

impl ActionButton {
    pub fn new(sink: ExportSink) -> Self {
        Self {
            sink,
            phase: ButtonPhase::Idle,
        }
    }

    pub fn label(&self) -> &'static str {
        match (self.sink, self.phase) {
            (ExportSink::Download, ButtonPhase::Busy) => "📸 Generating...",
            (ExportSink::Download, _) => "📱 Download Screenshot",
            (ExportSink::Clipboard, ButtonPhase::Busy) => "📸 Copying...",
            (ExportSink::Clipboard, ButtonPhase::Done { .. }) => "✅ Copied!",
            (ExportSink::Clipboard, ButtonPhase::Idle) => "📋 Copy to Clipboard",
        }
    }

    /// Buttons only accept clicks while idle.
    pub fn is_enabled(&self) -> bool {
        self.phase == ButtonPhase::Idle
    }

    /// Enter the busy phase. Returns `false` if the button was not idle.
    pub fn start(&mut self) -> bool {
        if !self.is_enabled() {
            return false;
        }
        self.phase = ButtonPhase::Busy;
        true
    }

    /// Return to idle immediately.
    pub fn reset(&mut self) {
        self.phase = ButtonPhase::Idle;
    }

    /// Show the confirmation for `duration` seconds, then go idle.
    pub fn confirm(&mut self, current_time: f64, duration: f64) {
        self.phase = ButtonPhase::Done {
            until: current_time + duration,
        };
    }

    /// Expire a finished confirmation.
    pub fn tick(&mut self, current_time: f64) {
        if let ButtonPhase::Done { until } = self.phase {
            if current_time >= until {
                self.phase = ButtonPhase::Idle;
            }
        }
    }
}

/// An export waiting for the window screenshot to arrive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingExport {
    pub sink: ExportSink,
    /// Frames rendered since the screenshot was requested
    pub frames_waited: u32,
}

// ─────────────────────────────────────────────────────────────────────────────
// UI State
// ─────────────────────────────────────────────────────────────────────────────

/// UI-related state flags.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Whether the settings panel is open
    pub show_settings: bool,
    /// Temporary toast message
    pub toast_message: Option<String>,
    /// When the toast message should expire (as seconds since app start)
    pub toast_expires_at: Option<f64>,
}

// ─────────────────────────────────────────────────────────────────────────────
// App State
// ─────────────────────────────────────────────────────────────────────────────

/// Everything the application mutates between frames.
#[derive(Debug, Clone)]
pub struct AppState {
    pub settings: Settings,
    pub form: PostForm,
    /// Always rendered from `form` before anything reads it
    pub preview: RenderedPreview,
    pub ui: UiState,
    pub download_button: ActionButton,
    pub copy_button: ActionButton,
    /// Exports waiting for the window screenshot; one screenshot serves all
    pub pending_exports: Vec<PendingExport>,
    settings_dirty: bool,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        let form = PostForm::with_theme(settings.default_post_theme);
        let preview = RenderedPreview::render(&form.to_draft());

        Self {
            settings,
            form,
            preview,
            ui: UiState::default(),
            download_button: ActionButton::new(ExportSink::Download),
            copy_button: ActionButton::new(ExportSink::Clipboard),
            pending_exports: Vec::new(),
            settings_dirty: false,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Form & Preview
    // ─────────────────────────────────────────────────────────────────────────

    /// Apply the character limit and re-render the preview.
    ///
    /// Call this in the same frame as any form edit.
    pub fn form_changed(&mut self) {
        if self.form.enforce_char_limit() {
            debug!("Post body truncated to the character limit");
        }
        self.preview = RenderedPreview::render(&self.form.to_draft());
    }

    pub fn apply_preset(&mut self, preset: Preset) {
        self.form.apply_preset(preset);
        self.form_changed();
        info!("Loaded preset {:?}", preset);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Export Buttons
    // ─────────────────────────────────────────────────────────────────────────

    pub fn button_mut(&mut self, sink: ExportSink) -> &mut ActionButton {
        match sink {
            ExportSink::Download => &mut self.download_button,
            ExportSink::Clipboard => &mut self.copy_button,
        }
    }

    /// Mark the button busy and, if requested, remember that a screenshot
    /// is on its way. Returns `false` if the button was already busy.
    pub fn begin_export(&mut self, sink: ExportSink, await_capture: bool) -> bool {
        if !self.button_mut(sink).start() {
            return false;
        }
        if await_capture {
            self.pending_exports.push(PendingExport {
                sink,
                frames_waited: 0,
            });
        }
        true
    }

    /// Count one frame without a screenshot.
    ///
    /// Removes and returns the exports whose frame budget is used up.
    pub fn tick_pending_exports(&mut self) -> Vec<PendingExport> {
        let budget = self.settings.export.capture_frame_budget;
        for pending in &mut self.pending_exports {
            pending.frames_waited += 1;
        }

        let (expired, waiting): (Vec<_>, Vec<_>) = self
            .pending_exports
            .drain(..)
            .partition(|pending| pending.frames_waited >= budget);
        self.pending_exports = waiting;

        for pending in &expired {
            warn!(
                "No screenshot after {} frames; exporting to {:?} without it",
                pending.frames_waited, pending.sink
            );
        }
        expired
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Settings
    // ─────────────────────────────────────────────────────────────────────────

    /// Mark settings as dirty (needing to be saved).
    pub fn mark_settings_dirty(&mut self) {
        self.settings_dirty = true;
    }

    /// Save settings to config file if modified.
    ///
    /// Returns `true` if settings were saved.
    pub fn save_settings_if_dirty(&mut self) -> bool {
        if self.settings_dirty {
            if save_config_silent(&self.settings) {
                self.settings_dirty = false;
                info!("Settings saved");
                return true;
            }
            warn!("Failed to save settings");
        }
        false
    }

    /// Prepare for application exit.
    pub fn shutdown(&mut self) {
        self.save_settings_if_dirty();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Toasts
    // ─────────────────────────────────────────────────────────────────────────

    /// Show a temporary toast message (disappears after duration).
    ///
    /// `current_time` should be the current app time in seconds.
    /// `duration` is how long to show the message in seconds.
    pub fn show_toast(&mut self, message: impl Into<String>, current_time: f64, duration: f64) {
        self.ui.toast_message = Some(message.into());
        self.ui.toast_expires_at = Some(current_time + duration);
    }

    /// Clear expired toasts and confirmations.
    ///
    /// Call this each frame with the current time.
    pub fn update_timers(&mut self, current_time: f64) {
        if let Some(expires_at) = self.ui.toast_expires_at {
            if current_time >= expires_at {
                self.ui.toast_message = None;
                self.ui.toast_expires_at = None;
            }
        }
        self.download_button.tick(current_time);
        self.copy_button.tick(current_time);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::PostTheme;

    fn state() -> AppState {
        AppState::new(Settings::default())
    }

    #[test]
    fn test_new_state_uses_default_post_theme() {
        let mut settings = Settings::default();
        settings.default_post_theme = PostTheme::Dark;
        let state = AppState::new(settings);
        assert_eq!(state.form.theme, PostTheme::Dark);
        assert_eq!(state.preview.theme, PostTheme::Dark);
    }

    #[test]
    fn test_form_changed_rerenders_preview() {
        let mut state = state();
        state.form.display_name = "Tech Guru".to_string();
        state.form.likes = "15400".to_string();
        state.form_changed();
        assert_eq!(state.preview.avatar.initials(), "TG");
        assert_eq!(state.preview.likes, "15.4K");
    }

    #[test]
    fn test_form_changed_truncates_body() {
        let mut state = state();
        state.form.post_text = "a".repeat(281);
        state.form_changed();
        assert_eq!(state.form.char_count(), 280);
    }

    #[test]
    fn test_button_labels() {
        let mut download = ActionButton::new(ExportSink::Download);
        assert_eq!(download.label(), "📱 Download Screenshot");
        download.start();
        assert_eq!(download.label(), "📸 Generating...");

        let mut copy = ActionButton::new(ExportSink::Clipboard);
        assert_eq!(copy.label(), "📋 Copy to Clipboard");
        copy.start();
        assert_eq!(copy.label(), "📸 Copying...");
        copy.confirm(0.0, COPIED_DISPLAY_SECS);
        assert_eq!(copy.label(), "✅ Copied!");
    }

    #[test]
    fn test_button_rejects_clicks_while_busy() {
        let mut button = ActionButton::new(ExportSink::Download);
        assert!(button.start());
        assert!(!button.is_enabled());
        assert!(!button.start());
        button.reset();
        assert!(button.is_enabled());
    }

    #[test]
    fn test_copied_confirmation_expires() {
        let mut state = state();
        state.copy_button.start();
        state.copy_button.confirm(10.0, COPIED_DISPLAY_SECS);

        state.update_timers(11.0);
        assert_eq!(state.copy_button.label(), "✅ Copied!");
        state.update_timers(12.0);
        assert_eq!(state.copy_button.phase, ButtonPhase::Idle);
    }

    #[test]
    fn test_pending_export_gives_up_after_budget() {
        let mut state = state();
        state.settings.export.capture_frame_budget = 3;
        assert!(state.begin_export(ExportSink::Download, true));

        assert!(state.tick_pending_exports().is_empty());
        assert!(state.tick_pending_exports().is_empty());
        let expired = state.tick_pending_exports();
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].sink, ExportSink::Download);
        assert!(state.pending_exports.is_empty());
        // Button stays busy until the export itself finishes
        assert_eq!(state.download_button.phase, ButtonPhase::Busy);
    }

    #[test]
    fn test_both_sinks_can_wait_for_capture() {
        let mut state = state();
        state.settings.export.capture_frame_budget = 2;
        assert!(state.begin_export(ExportSink::Download, true));
        assert!(state.tick_pending_exports().is_empty());
        assert!(state.begin_export(ExportSink::Clipboard, true));

        let first = state.tick_pending_exports();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].sink, ExportSink::Download);

        let second = state.tick_pending_exports();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].sink, ExportSink::Clipboard);
        assert!(state.pending_exports.is_empty());
    }

    #[test]
    fn test_begin_export_without_capture() {
        let mut state = state();
        assert!(state.begin_export(ExportSink::Clipboard, false));
        assert!(state.pending_exports.is_empty());
        assert!(!state.begin_export(ExportSink::Clipboard, false));
    }

    #[test]
    fn test_toast_expires() {
        let mut state = state();
        state.show_toast("Saved", 1.0, 2.0);
        state.update_timers(2.0);
        assert_eq!(state.ui.toast_message.as_deref(), Some("Saved"));
        state.update_timers(3.0);
        assert!(state.ui.toast_message.is_none());
    }

    #[test]
    fn test_apply_preset_refreshes_preview() {
        let mut state = state();
        state.apply_preset(Preset::Funny);
        assert_eq!(state.preview.display_name, "Meme Lord");
        assert_eq!(state.preview.likes, "24.6K");
        assert!(!state.preview.verified_badge_visible);
    }
}
