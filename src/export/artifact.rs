//! Export artifacts and file output
//!
//! An [`ExportArtifact`] is the finished image of one export run. It keeps
//! both the RGBA pixels (for the clipboard) and the encoded PNG (for files).

use std::fmt;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use image::{ImageFormat, RgbaImage};
use log::info;

use super::pipeline::{TierError, TierKind};

/// Prefix of every exported image file.
pub const FILE_PREFIX: &str = "viral-post-";

/// The product of an export run.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub image: RgbaImage,
    pub png: Vec<u8>,
    /// Tier that produced the image
    pub tier: TierKind,
}

/// Encode an RGBA image as PNG bytes.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, TierError> {
    if image.width() == 0 || image.height() == 0 {
        return Err(TierError::Encode("image has no pixels".to_string()));
    }

    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageFormat::Png)
        .map_err(|e| TierError::Encode(e.to_string()))?;
    Ok(buffer.into_inner())
}

/// Milliseconds since the Unix epoch.
pub fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

/// `viral-post-<millis>.png`
pub fn artifact_file_name(millis: u128) -> String {
    format!("{}{}.png", FILE_PREFIX, millis)
}

// ─────────────────────────────────────────────────────────────────────────────
// Sink Errors
// ─────────────────────────────────────────────────────────────────────────────

/// Errors raised by the download and print sinks.
#[derive(Debug)]
pub enum SinkError {
    /// Writing an output file failed
    Io { path: PathBuf, source: std::io::Error },
    /// Opening the written file with the system handler failed
    Open { path: PathBuf, source: std::io::Error },
}

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SinkError::Io { path, source } => {
                write!(f, "Failed to write '{}': {}", path.display(), source)
            }
            SinkError::Open { path, source } => {
                write!(f, "Failed to open '{}': {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for SinkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SinkError::Io { source, .. } | SinkError::Open { source, .. } => Some(source),
        }
    }
}

/// `file_name`, or `<stem>-<n>.<ext>` if that name is already taken in `dir`.
fn free_file_name(dir: &Path, file_name: &str) -> String {
    if !dir.join(file_name).exists() {
        return file_name.to_string();
    }

    let name = Path::new(file_name);
    let stem = name
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = name
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let mut n = 1u32;
    loop {
        let candidate = format!("{}-{}{}", stem, n, extension);
        if !dir.join(&candidate).exists() {
            return candidate;
        }
        n += 1;
    }
}

/// Move a fully written temporary file into place, removing it on failure.
fn commit_partial(partial: &Path, path: &Path) -> Result<(), SinkError> {
    fs::rename(partial, path).map_err(|source| {
        let _ = fs::remove_file(partial);
        SinkError::Io {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// Write `bytes` to `dir/file_name` through a temporary sibling file.
///
/// The directory is created if needed. An existing file is never replaced:
/// a numeric suffix is added instead. Returns the final path.
pub fn write_atomically(dir: &Path, file_name: &str, bytes: &[u8]) -> Result<PathBuf, SinkError> {
    fs::create_dir_all(dir).map_err(|source| SinkError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let file_name = free_file_name(dir, file_name);
    let path = dir.join(&file_name);
    let partial = dir.join(format!("{}.part", file_name));

    fs::write(&partial, bytes).map_err(|source| {
        let _ = fs::remove_file(&partial);
        SinkError::Io {
            path: partial.clone(),
            source,
        }
    })?;
    commit_partial(&partial, &path)?;

    info!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(path)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
