//! UI components for Viral Post
//!
//! This module contains the form panel, the live post card and the
//! settings modal.

mod avatar;
pub mod form_panel;
pub mod preview_card;
mod settings;

pub use avatar::AvatarCache;
pub use settings::SettingsPanel;
