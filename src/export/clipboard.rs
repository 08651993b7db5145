//! Clipboard sink
//!
//! Places exported images on the system clipboard using the arboard crate.
//! When the clipboard refuses the write, the artifact is saved through the
//! download sink instead so the user always ends up with the image.

// - enum_variant_names: Error variants follow standard naming convention
#![allow(clippy::enum_variant_names)]

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use arboard::{Clipboard, ImageData};
use image::RgbaImage;
use log::{info, warn};

use super::artifact::{ExportArtifact, SinkError};
use super::download::save_artifact;

// ─────────────────────────────────────────────────────────────────────────────
// Clipboard Error
// ─────────────────────────────────────────────────────────────────────────────

/// Errors that can occur during clipboard operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipboardError {
    /// Failed to access clipboard
    AccessError(String),
    /// Failed to set clipboard content
    WriteError(String),
}

impl std::fmt::Display for ClipboardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClipboardError::AccessError(msg) => write!(f, "Clipboard access error: {}", msg),
            ClipboardError::WriteError(msg) => write!(f, "Clipboard write error: {}", msg),
        }
    }
}

impl std::error::Error for ClipboardError {}

impl From<arboard::Error> for ClipboardError {
    fn from(err: arboard::Error) -> Self {
        ClipboardError::WriteError(err.to_string())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Backends
// ─────────────────────────────────────────────────────────────────────────────

/// Destination for clipboard images.
pub trait ClipboardBackend {
    fn set_image(&mut self, image: &RgbaImage) -> Result<(), ClipboardError>;
}

/// The system clipboard. A connection is opened per write.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl ClipboardBackend for SystemClipboard {
    fn set_image(&mut self, image: &RgbaImage) -> Result<(), ClipboardError> {
        let mut clipboard =
            Clipboard::new().map_err(|e| ClipboardError::AccessError(e.to_string()))?;

        clipboard.set_image(ImageData {
            width: image.width() as usize,
            height: image.height() as usize,
            bytes: Cow::Borrowed(image.as_raw().as_slice()),
        })?;

        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Clipboard Operations
// ─────────────────────────────────────────────────────────────────────────────

/// Where a copied artifact ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    /// The image is on the clipboard
    Copied,
    /// The clipboard refused the image; it was saved to this file instead
    SavedInstead(PathBuf),
}

/// Copy the artifact to the clipboard, or save it to `fallback_dir` if the
/// clipboard write fails.
pub fn copy_or_download(
    backend: &mut dyn ClipboardBackend,
    artifact: &ExportArtifact,
    fallback_dir: &Path,
) -> Result<CopyOutcome, SinkError> {
    match backend.set_image(&artifact.image) {
        Ok(()) => {
            info!(
                "Copied {}x{} image to clipboard",
                artifact.image.width(),
                artifact.image.height()
            );
            Ok(CopyOutcome::Copied)
        }
        Err(e) => {
            warn!("{}; saving the image instead", e);
            save_artifact(artifact, fallback_dir).map(CopyOutcome::SavedInstead)
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::pipeline::TierKind;
    use image::Rgba;
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingClipboard {
        images: Vec<(u32, u32)>,
        fail: bool,
    }

    impl ClipboardBackend for RecordingClipboard {
        fn set_image(&mut self, image: &RgbaImage) -> Result<(), ClipboardError> {
            if self.fail {
                return Err(ClipboardError::AccessError("permission denied".to_string()));
            }
            self.images.push(image.dimensions());
            Ok(())
        }
    }

    fn artifact() -> ExportArtifact {
        ExportArtifact {
            image: RgbaImage::from_pixel(4, 2, Rgba([1, 2, 3, 255])),
            png: b"\x89PNG".to_vec(),
            tier: TierKind::Vector,
        }
    }

    #[test]
    fn test_clipboard_error_display() {
        let err = ClipboardError::AccessError("test".to_string());
        assert!(err.to_string().contains("test"));
    }

    #[test]
    fn test_clipboard_error_write() {
        let err = ClipboardError::WriteError("write failed".to_string());
        assert!(err.to_string().contains("write failed"));
    }

    #[test]
    fn test_copy_places_image_on_clipboard() {
        let temp = TempDir::new().unwrap();
        let mut clipboard = RecordingClipboard::default();

        let outcome = copy_or_download(&mut clipboard, &artifact(), temp.path()).unwrap();
        assert_eq!(outcome, CopyOutcome::Copied);
        assert_eq!(clipboard.images, vec![(4, 2)]);
        assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_denied_clipboard_falls_back_to_download() {
        let temp = TempDir::new().unwrap();
        let mut clipboard = RecordingClipboard {
            fail: true,
            ..Default::default()
        };

        let outcome = copy_or_download(&mut clipboard, &artifact(), temp.path()).unwrap();
        match outcome {
            CopyOutcome::SavedInstead(path) => {
                assert!(path.starts_with(temp.path()));
                assert_eq!(std::fs::read(path).unwrap(), b"\x89PNG");
            }
            CopyOutcome::Copied => panic!("Expected SavedInstead"),
        }
    }

    // Note: Actual clipboard tests require a display/clipboard context
    // which isn't typically available in CI environments.
}
