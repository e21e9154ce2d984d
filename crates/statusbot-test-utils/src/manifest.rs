//! Temporary manifest files for identity resolution tests.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A manifest file inside an owned temp directory.
///
/// The directory is deleted when this value is dropped.
pub struct TempManifest {
    path: PathBuf,
    _temp_dir: TempDir,
}

impl TempManifest {
    /// Write `content` to a `package.json` manifest.
    pub async fn json(content: &str) -> Self {
        Self::write("package.json", content).await
    }

    /// Write `content` to a `Cargo.toml` manifest.
    pub async fn toml(content: &str) -> Self {
        Self::write("Cargo.toml", content).await
    }

    /// Write `content` to a manifest with the given file name.
    pub async fn write(file_name: &str, content: &str) -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let path = temp_dir.path().join(file_name);
        tokio::fs::write(&path, content)
            .await
            .expect("failed to write test manifest");
        Self {
            path,
            _temp_dir: temp_dir,
        }
    }

    /// Path of the manifest file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}
