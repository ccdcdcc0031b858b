pub mod models;

pub use models::*;

use crate::services::fs_utils::file_utils::atomic_write;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// JSON-backed installer settings.
pub struct ConfigService {
    path: PathBuf,
    settings: Mutex<InstallerSettings>,
}

impl ConfigService {
    /// Load settings from `path`. A missing or unreadable file yields defaults.
    pub fn new(path: PathBuf) -> Self {
        let settings = Self::load(&path);
        Self {
            path,
            settings: Mutex::new(settings),
        }
    }

    fn load(path: &Path) -> InstallerSettings {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No config at {}, using defaults", path.display());
                return InstallerSettings::default();
            }
            Err(e) => {
                log::error!("Failed to read config {}: {e}", path.display());
                return InstallerSettings::default();
            }
        };

        match serde_json::from_str(&content) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("Failed to parse config {}: {e}", path.display());
                InstallerSettings::default()
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get_settings(&self) -> InstallerSettings {
        self.settings
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn save_settings(&self, new_settings: InstallerSettings) -> Result<(), String> {
        let json = serde_json::to_string_pretty(&new_settings).map_err(|e| e.to_string())?;
        atomic_write(&self.path, json.as_bytes())
            .map_err(|e| format!("Failed to write {}: {e}", self.path.display()))?;

        *self
            .settings
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = new_settings;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
