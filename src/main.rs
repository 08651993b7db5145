// Hide console window on Windows in release builds
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

//! Viral Post - Main Entry Point
//!
//! A desktop mockup generator for social media posts. Built with Rust and egui.

mod app;
mod config;
mod draft;
mod error;
mod export;
mod files;
mod format;
mod preview;
mod state;
mod theme;
mod ui;

use app::ViralPostApp;
use config::load_config;
use log::info;

/// Application name constant.
const APP_NAME: &str = "Viral Post";

fn main() -> eframe::Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Starting {}", APP_NAME);

    // Load settings to get window configuration
    let settings = load_config();
    let window_size = settings.window_size;

    info!(
        "Window configuration: {}x{}, maximized: {}",
        window_size.width, window_size.height, window_size.maximized
    );

    let viewport = eframe::egui::ViewportBuilder::default()
        .with_title(APP_NAME)
        .with_inner_size([window_size.width, window_size.height])
        .with_min_inner_size([900.0, 600.0])
        .with_maximized(window_size.maximized);

    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        APP_NAME,
        native_options,
        Box::new(move |cc| Ok(Box::new(ViralPostApp::new(cc, settings)))),
    )
}
