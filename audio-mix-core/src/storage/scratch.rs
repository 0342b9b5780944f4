use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::models::error::MixError;

/// Uniquely named staging directory for one engine instance.
///
/// Created as `mix-<random>` under a shared scratch root, so concurrent
/// engines never see each other's files. Everything inside is removed
/// when the directory is closed or dropped; removal failures are logged
/// and otherwise ignored.
///
/// ## Layout
/// ```text
/// <scratch root>/
/// ├── mix-a1B2c3/          ← one ScratchDir
/// │   ├── speech.mp3
/// │   ├── music.mp3
/// │   └── output.mp3
/// └── mix-x9Y8z7/
/// ```
pub struct ScratchDir {
    path: PathBuf,
    dir: Option<TempDir>,
}

impl ScratchDir {
    /// Create a fresh directory under `root`, creating `root` first if needed.
    pub fn create_in(root: &Path) -> Result<Self, MixError> {
        fs::create_dir_all(root)
            .map_err(|e| MixError::Storage(format!("failed to create scratch root {}: {}", root.display(), e)))?;

        let dir = tempfile::Builder::new()
            .prefix("mix-")
            .tempdir_in(root)
            .map_err(|e| MixError::Storage(format!("failed to create scratch directory: {}", e)))?;

        let path = dir.path().to_path_buf();
        log::debug!("Created scratch directory {}", path.display());
        Ok(Self { path, dir: Some(dir) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Resolve a bare file name inside the directory.
    ///
    /// Names containing path separators or parent references are rejected.
    pub fn file_path(&self, name: &str) -> Result<PathBuf, MixError> {
        if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
            return Err(MixError::Storage(format!("invalid scratch file name: {:?}", name)));
        }
        Ok(self.path.join(name))
    }

    pub fn write(&self, name: &str, data: &[u8]) -> Result<PathBuf, MixError> {
        let path = self.file_path(name)?;
        fs::write(&path, data)
            .map_err(|e| MixError::Storage(format!("failed to write {}: {}", name, e)))?;
        Ok(path)
    }

    pub fn read(&self, name: &str) -> Result<Vec<u8>, MixError> {
        let path = self.file_path(name)?;
        fs::read(&path).map_err(|e| MixError::Storage(format!("failed to read {}: {}", name, e)))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.file_path(name).map(|p| p.is_file()).unwrap_or(false)
    }

    /// Delete one file. A file that is already gone is not an error.
    pub fn remove(&self, name: &str) -> Result<(), MixError> {
        let path = self.file_path(name)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(MixError::Storage(format!("failed to delete {}: {}", name, e))),
        }
    }

    /// Remove the directory and everything in it, reporting failure.
    pub fn close(mut self) -> Result<(), MixError> {
        match self.dir.take() {
            Some(dir) => dir
                .close()
                .map_err(|e| MixError::Storage(format!("failed to remove {}: {}", self.path.display(), e))),
            None => Ok(()),
        }
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if let Some(dir) = self.dir.take() {
            if let Err(e) = dir.close() {
                log::warn!("Error deleting scratch directory {}: {}", self.path.display(), e);
            }
        }
    }
}
