//! Native file dialog integration using the rfd crate
//!
//! This module provides the folder picker for the export directory and the
//! image picker for a local avatar.

use rfd::FileDialog;
use std::path::{Path, PathBuf};

/// Image formats the avatar loader can decode.
const AVATAR_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Opens a native folder picker for the directory downloads are saved to.
///
/// Returns `Some(PathBuf)` if a folder was selected, `None` if cancelled.
pub fn pick_export_folder(initial_dir: Option<&Path>) -> Option<PathBuf> {
    let mut dialog = FileDialog::new().set_title("Choose Export Folder");

    if let Some(dir) = initial_dir {
        dialog = dialog.set_directory(dir);
    }

    dialog.pick_folder()
}

/// Opens a native file dialog for choosing an avatar image.
///
/// Returns `Some(PathBuf)` if a file was selected, `None` if cancelled.
pub fn pick_avatar_image(initial_dir: Option<&Path>) -> Option<PathBuf> {
    let mut dialog = FileDialog::new()
        .set_title("Choose Avatar Image")
        .add_filter("Images", AVATAR_EXTENSIONS)
        .add_filter("All Files", &["*"]);

    if let Some(dir) = initial_dir {
        dialog = dialog.set_directory(dir);
    }

    dialog.pick_file()
}
