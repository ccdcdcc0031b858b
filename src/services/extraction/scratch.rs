use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Every file materialised outside the mod directory during an install.
#[derive(Debug, Default)]
pub struct ScratchFiles {
    paths: BTreeSet<PathBuf>,
}

impl ScratchFiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, path: PathBuf) {
        self.paths.insert(path);
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.paths.contains(path)
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.paths.iter().map(PathBuf::as_path)
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Hand the recorded paths to the caller, forgetting them here.
    pub fn take_paths(&mut self) -> Vec<PathBuf> {
        std::mem::take(&mut self.paths).into_iter().collect()
    }

    /// Delete everything recorded. Failures are logged and skipped.
    pub fn cleanup(&mut self) {
        for path in std::mem::take(&mut self.paths) {
            let result = if path.is_dir() {
                fs::remove_dir_all(&path)
            } else {
                fs::remove_file(&path)
            };
            match result {
                Ok(()) => log::debug!("Removed scratch file {}", path.display()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => log::warn!("Failed to remove scratch file {}: {e}", path.display()),
            }
        }
    }
}
