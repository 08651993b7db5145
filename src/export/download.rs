//! Download sink
//!
//! Saves an artifact as `viral-post-<unix-millis>.png` in the export
//! directory, and can hand the written file to the system image viewer.

use std::path::{Path, PathBuf};

use log::{info, warn};

use super::artifact::{artifact_file_name, unix_millis, write_atomically, ExportArtifact, SinkError};

/// Pick the directory exports are written to.
///
/// Order: the configured directory, the platform download directory, then
/// the current working directory.
pub fn resolve_export_dir(configured: Option<&Path>) -> PathBuf {
    if let Some(dir) = configured {
        return dir.to_path_buf();
    }

    dirs::download_dir()
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Write the artifact's PNG bytes into `dir` under a fresh file name.
pub fn save_artifact(artifact: &ExportArtifact, dir: &Path) -> Result<PathBuf, SinkError> {
    let file_name = artifact_file_name(unix_millis());
    let path = write_atomically(dir, &file_name, &artifact.png)?;
    info!(
        "Saved {} export to {}",
        artifact.tier.label(),
        path.display()
    );
    Ok(path)
}

/// Open a written file with the default application.
pub fn open_saved(path: &Path) -> Result<(), SinkError> {
    open::that(path).map_err(|source| {
        warn!("Failed to open {}: {}", path.display(), source);
        SinkError::Open {
            path: path.to_path_buf(),
            source,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::pipeline::TierKind;
    use image::RgbaImage;
    use tempfile::TempDir;

    fn artifact() -> ExportArtifact {
        ExportArtifact {
            image: RgbaImage::new(1, 1),
            png: b"\x89PNGfake".to_vec(),
            tier: TierKind::Canvas,
        }
    }

    #[test]
    fn test_configured_dir_wins() {
        let dir = PathBuf::from("/srv/exports");
        assert_eq!(resolve_export_dir(Some(&dir)), dir);
    }

    #[test]
    fn test_default_dir_is_never_empty() {
        assert!(!resolve_export_dir(None).as_os_str().is_empty());
    }

    #[test]
    fn test_save_artifact_naming_and_contents() {
        let temp = TempDir::new().unwrap();
        let path = save_artifact(&artifact(), temp.path()).unwrap();

        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("viral-post-"));
        assert!(name.ends_with(".png"));
        let millis = &name["viral-post-".len()..name.len() - ".png".len()];
        assert!(millis.parse::<u128>().is_ok());

        assert_eq!(std::fs::read(&path).unwrap(), artifact().png);
    }
}
