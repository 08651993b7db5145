//! Main application module for Viral Post
//!
//! This module implements the eframe App trait: it lays out the form and the
//! live card, and drives exports from button click through screenshot
//! capture and the fallback chain to the chosen sink.

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::{Settings, WindowSize};
use crate::error::{Error, Result};
use crate::export::capture::ElementRasterizer;
use crate::export::clipboard::ClipboardBackend;
use crate::export::fonts::bundled_font;
use crate::export::svg::font_database;
use crate::export::{
    copy_or_download, frame_from_color_image, open_print_document, open_saved,
    resolve_export_dir, save_artifact, CanvasTier, CopyOutcome, ExportArtifact, ExportPipeline,
    FrameCapture, LibraryTier, RasterRequest, SystemClipboard, VectorTier,
};
use crate::files::dialogs::{pick_avatar_image, pick_export_folder};
use crate::state::{AppState, ExportSink, COPIED_DISPLAY_SECS};
use crate::theme::visuals::apply_theme;
use crate::ui::{form_panel, preview_card, AvatarCache, SettingsPanel};
use eframe::egui;
use log::{debug, info, warn};

/// Shown when a download could not be produced at all.
const DOWNLOAD_FAILED_MESSAGE: &str =
    "Screenshot generation failed. Try the Copy to Clipboard button instead.";
/// Shown when a copy could not be produced at all.
const COPY_FAILED_MESSAGE: &str = "Copy to clipboard not supported. Try download instead.";

/// What a finished export should tell the user.
enum ExportOutcome {
    Saved(PathBuf),
    Copied,
    CopySavedInstead(PathBuf),
}

/// The main application struct that holds all state and implements eframe::App.
pub struct ViralPostApp {
    /// Central application state
    state: AppState,
    /// Settings panel component
    settings_panel: SettingsPanel,
    /// Decoded avatar textures
    avatar_cache: AvatarCache,
    /// SVG reconstruction tier (font database is built once)
    vector_tier: VectorTier,
    /// Manual canvas tier
    canvas_tier: CanvasTier,
    /// Card rectangle from the last frame, in points
    card_rect: Option<egui::Rect>,
    /// Whether the whole card was inside the visible area last frame
    card_visible: bool,
    /// Last known window size (for detecting changes)
    last_window_size: Option<egui::Vec2>,
    /// Application start time for timing toasts and confirmations
    start_time: std::time::Instant,
}

impl ViralPostApp {
    /// Create the application with the settings loaded at startup.
    pub fn new(cc: &eframe::CreationContext<'_>, settings: Settings) -> Self {
        info!("Initializing Viral Post");

        apply_theme(&cc.egui_ctx, settings.theme);

        let bundled = bundled_font();
        let vector_tier = VectorTier::new(font_database(true, bundled.as_deref()));
        let canvas_tier = CanvasTier::new(true, bundled.as_deref());

        Self {
            state: AppState::new(settings),
            settings_panel: SettingsPanel::new(),
            avatar_cache: AvatarCache::new(),
            vector_tier,
            canvas_tier,
            card_rect: None,
            card_visible: false,
            last_window_size: None,
            start_time: std::time::Instant::now(),
        }
    }

    /// Get elapsed time since app start in seconds.
    fn get_app_time(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }

    /// Update window size in settings if changed.
    fn update_window_state(&mut self, ctx: &egui::Context) {
        let Some(size) = ctx.input(|i| i.viewport().inner_rect.map(|rect| rect.size())) else {
            return;
        };

        let changed = self
            .last_window_size
            .map(|s| (s - size).length() > 1.0)
            .unwrap_or(true);
        if !changed {
            return;
        }

        self.last_window_size = Some(size);
        let maximized = ctx.input(|i| i.viewport().maximized.unwrap_or(false));
        let window_size = WindowSize {
            width: size.x,
            height: size.y,
            maximized,
        };

        if self.state.settings.window_size != window_size {
            debug!(
                "Window state updated: {}x{}, maximized: {}",
                size.x, size.y, maximized
            );
            self.state.settings.window_size = window_size;
            self.state.mark_settings_dirty();
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Rendering
    // ─────────────────────────────────────────────────────────────────────────

    fn render_ui(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("title_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Viral Post");
                ui.label(egui::RichText::new("Post mockup generator").weak());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("⚙").on_hover_text("Settings").clicked() {
                        self.state.ui.show_settings = true;
                    }
                });
            });
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if let Some(toast) = &self.state.ui.toast_message {
                    ui.label(egui::RichText::new(toast).italics());
                } else {
                    ui.label(egui::RichText::new("Ready").weak());
                }
            });
        });

        egui::SidePanel::left("form_panel")
            .resizable(false)
            .exact_width(360.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let output = form_panel::show(ui, &mut self.state.form, &self.state.preview);
                    if let Some(preset) = output.preset {
                        self.state.apply_preset(preset);
                    } else if output.changed {
                        self.state.form_changed();
                    }
                    if output.browse_avatar {
                        self.handle_browse_avatar();
                    }
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.add_space(24.0);

                    let avatar = self
                        .state
                        .preview
                        .avatar
                        .image_source()
                        .and_then(|source| self.avatar_cache.texture(ctx, source));
                    let card = preview_card::show(ui, &self.state.preview, avatar.as_ref());
                    self.card_visible = ui.clip_rect().contains_rect(card);
                    self.card_rect = Some(card);

                    ui.add_space(20.0);
                    self.render_action_buttons(ui, ctx);
                });
            });
        });

        if self.state.ui.show_settings {
            self.render_settings(ctx);
        }
    }

    fn render_action_buttons(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui.horizontal(|ui| {
            let width = preview_card::body_wrap_width();
            ui.add_space(((ui.available_width() - width) / 2.0).max(0.0));

            for sink in [ExportSink::Download, ExportSink::Clipboard] {
                let button = *self.state.button_mut(sink);
                if ui
                    .add_enabled(button.is_enabled(), egui::Button::new(button.label()))
                    .clicked()
                {
                    self.handle_export_click(ctx, sink);
                }
            }

            if ui.button("🖨 Print").clicked() {
                self.handle_print();
            }
        });
    }

    fn render_settings(&mut self, ctx: &egui::Context) {
        let is_dark = ctx.style().visuals.dark_mode;
        let output = self
            .settings_panel
            .show(ctx, &mut self.state.settings, is_dark);

        if output.browse_export_dir {
            let initial = self.state.settings.export.export_directory.clone();
            if let Some(dir) = pick_export_folder(initial.as_deref()) {
                info!("Export folder set to {}", dir.display());
                self.state.settings.export.export_directory = Some(dir);
                self.state.mark_settings_dirty();
            }
        }

        if output.reset_requested {
            info!("Resetting settings to defaults");
            self.state.settings = Settings::default();
            apply_theme(ctx, self.state.settings.theme);
            self.state.mark_settings_dirty();
        } else if output.changed {
            apply_theme(ctx, self.state.settings.theme);
            self.state.mark_settings_dirty();
        }

        if output.close_requested {
            self.state.ui.show_settings = false;
            self.state.save_settings_if_dirty();
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Actions
    // ─────────────────────────────────────────────────────────────────────────

    fn handle_browse_avatar(&mut self) {
        if let Some(path) = pick_avatar_image(None) {
            self.state.form.avatar_url = path.display().to_string();
            self.avatar_cache.clear();
            self.state.form_changed();
        }
    }

    fn handle_print(&mut self) {
        let time = self.get_app_time();
        let delay = self.state.settings.export.print_delay_ms;
        match open_print_document(&self.state.preview, delay) {
            Ok(path) => {
                debug!("Print document at {}", path.display());
                self.state.show_toast("Opened print view in your browser", time, 2.5);
            }
            Err(e) => {
                warn!("Print failed: {}", e);
                self.state
                    .show_toast(format!("Could not open print view: {}", e), time, 3.0);
            }
        }
    }

    /// Start an export. With screenshot capture enabled the work finishes
    /// once the frame arrives (or the frame budget runs out).
    fn handle_export_click(&mut self, ctx: &egui::Context, sink: ExportSink) {
        let capture = self.state.settings.export.capture_preview && self.card_rect.is_some();
        if !self.state.begin_export(sink, capture) {
            return;
        }

        if capture {
            debug!("Requesting viewport screenshot for {:?}", sink);
            ctx.send_viewport_cmd(egui::ViewportCommand::Screenshot);
            ctx.request_repaint();
        } else {
            self.finish_export(ctx, sink, None);
        }
    }

    /// Resolve pending exports from this frame's events.
    fn poll_pending_exports(&mut self, ctx: &egui::Context) {
        if self.state.pending_exports.is_empty() {
            return;
        }

        if let Some(shot) = take_screenshot(ctx) {
            let capture = self.frame_capture(ctx, &shot);
            if capture.is_none() {
                warn!("Screenshot could not be used; continuing without it");
            }
            let pending = std::mem::take(&mut self.state.pending_exports);
            for export in pending {
                self.finish_export(ctx, export.sink, capture.as_ref());
            }
            return;
        }

        for expired in self.state.tick_pending_exports() {
            self.finish_export(ctx, expired.sink, None);
        }
        if !self.state.pending_exports.is_empty() {
            ctx.request_repaint();
        }
    }

    fn frame_capture(&self, ctx: &egui::Context, shot: &egui::ColorImage) -> Option<FrameCapture> {
        let rect = self.card_rect?;
        if !self.card_visible {
            debug!("Card is partly scrolled out of view");
            return None;
        }
        let frame = frame_from_color_image(shot)?;
        Some(FrameCapture::new(
            frame,
            [rect.left(), rect.top(), rect.width(), rect.height()],
            ctx.pixels_per_point(),
        ))
    }

    /// Run the pipeline and the sink, then settle the button and the toast.
    fn finish_export(
        &mut self,
        ctx: &egui::Context,
        sink: ExportSink,
        capture: Option<&FrameCapture>,
    ) {
        let result = self.run_export(sink, capture);
        let time = self.get_app_time();

        match result {
            Ok(ExportOutcome::Saved(path)) => {
                self.state.button_mut(sink).reset();
                self.state
                    .show_toast(format!("Saved {}", path.display()), time, 3.0);
            }
            Ok(ExportOutcome::Copied) => {
                self.state
                    .button_mut(sink)
                    .confirm(time, COPIED_DISPLAY_SECS);
            }
            Ok(ExportOutcome::CopySavedInstead(path)) => {
                self.state.button_mut(sink).reset();
                self.state.show_toast(
                    format!("Clipboard unavailable. Saved {} instead", path.display()),
                    time,
                    3.5,
                );
            }
            Err(e) => {
                warn!("Export to {:?} failed: {}", sink, e);
                self.state.button_mut(sink).reset();
                let message = match (&e, sink) {
                    (Error::Export(_), ExportSink::Download) => DOWNLOAD_FAILED_MESSAGE.to_string(),
                    (Error::Export(_), ExportSink::Clipboard) => COPY_FAILED_MESSAGE.to_string(),
                    _ => format!("Export failed: {}", e),
                };
                self.state.show_toast(message, time, 4.0);
            }
        }

        ctx.request_repaint();
    }

    fn run_export(
        &self,
        sink: ExportSink,
        capture: Option<&FrameCapture>,
    ) -> Result<ExportOutcome> {
        let export = &self.state.settings.export;
        let request = match self.card_rect {
            Some(rect) => RasterRequest::new(rect.width(), rect.height(), export.scale),
            None => RasterRequest::for_preview(&self.state.preview, export.scale),
        };

        let artifact = self.rasterize(&request, capture)?;
        let dir = resolve_export_dir(export.export_directory.as_deref());

        match sink {
            ExportSink::Download => {
                let path = save_artifact(&artifact, &dir)?;
                if export.open_after_export {
                    if let Err(e) = open_saved(&path) {
                        warn!("Could not open exported image: {}", e);
                    }
                }
                Ok(ExportOutcome::Saved(path))
            }
            ExportSink::Clipboard => {
                let mut clipboard = SystemClipboard;
                let backend: &mut dyn ClipboardBackend = &mut clipboard;
                match copy_or_download(backend, &artifact, &dir)? {
                    CopyOutcome::Copied => Ok(ExportOutcome::Copied),
                    CopyOutcome::SavedInstead(path) => Ok(ExportOutcome::CopySavedInstead(path)),
                }
            }
        }
    }

    fn rasterize(
        &self,
        request: &RasterRequest,
        capture: Option<&FrameCapture>,
    ) -> Result<ExportArtifact> {
        let library = LibraryTier::new(capture.map(|c| c as &dyn ElementRasterizer));
        let pipeline = ExportPipeline::new()
            .with_tier(library)
            .with_tier(&self.vector_tier)
            .with_tier(&self.canvas_tier);

        let artifact = pipeline.run(&self.state.preview, request)?;
        info!(
            "Export produced by {} ({} bytes)",
            artifact.tier.label(),
            artifact.png.len()
        );
        Ok(artifact)
    }
}

/// The screenshot delivered this frame, if any.
fn take_screenshot(ctx: &egui::Context) -> Option<Arc<egui::ColorImage>> {
    ctx.input(|i| {
        i.raw.events.iter().find_map(|event| match event {
            egui::Event::Screenshot { image, .. } => Some(image.clone()),
            _ => None,
        })
    })
}

impl eframe::App for ViralPostApp {
    /// Called each time the UI needs repainting.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let current_time = self.get_app_time();
        self.state.update_timers(current_time);
        if self.state.ui.toast_message.is_some() || !self.state.copy_button.is_enabled() {
            ctx.request_repaint_after(std::time::Duration::from_millis(250));
        }

        self.update_window_state(ctx);

        // Screenshots requested last frame arrive as input events
        self.poll_pending_exports(ctx);

        self.render_ui(ctx);
    }

    /// Called when the application is about to close.
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Application exiting");
        self.state.shutdown();
    }

    /// Save persistent state.
    fn save(&mut self, _storage: &mut dyn eframe::Storage) {
        debug!("Saving application state");
        self.state.save_settings_if_dirty();
    }
}
