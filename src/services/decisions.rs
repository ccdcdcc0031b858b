//! Questions the install pipeline asks while it runs.
//!
//! Every call blocks the install until it returns. A provider may be asked
//! the same question several times during one install.

use crate::services::tree::DirectoryNode;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What to do with a mod directory that already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverwriteAction {
    /// Only make a backup, then ask again.
    Backup,
    /// Pick a different name.
    Rename,
    /// Delete the old content but keep its metadata sidecar.
    Replace,
    /// Extract on top of the old content.
    Merge,
    /// Give up on the install.
    Abort,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverwriteDecision {
    pub action: OverwriteAction,
    /// Name to use for [`OverwriteAction::Rename`]. When absent the
    /// provider is asked through `get_mod_name`.
    pub new_name: Option<String>,
    /// Copy the existing directory aside before acting.
    pub backup: bool,
}

impl OverwriteDecision {
    pub fn new(action: OverwriteAction) -> Self {
        Self {
            action,
            new_name: None,
            backup: false,
        }
    }

    pub fn with_backup(action: OverwriteAction) -> Self {
        Self {
            backup: true,
            ..Self::new(action)
        }
    }

    pub fn rename_to(name: impl Into<String>) -> Self {
        Self {
            new_name: Some(name.into()),
            ..Self::new(OverwriteAction::Rename)
        }
    }
}

/// Why the pipeline is asking for a mod name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PromptReason {
    /// The user chose to rename instead of overwriting.
    Rename,
    /// The current name is empty after sanitising.
    InvalidName,
}

pub trait DecisionProvider {
    /// Password for an encrypted archive. `None` gives up.
    fn get_password(&mut self) -> Option<String>;

    /// `target` already exists; decide how to proceed.
    fn resolve_overwrite(&mut self, target: &Path) -> OverwriteDecision;

    /// Ask for a mod name, pre-filled with `current`. `None` cancels.
    fn get_mod_name(&mut self, reason: PromptReason, current: &str) -> Option<String>;

    /// Whether to install `tree` exactly as laid out in the archive.
    fn confirm_manual_install(&mut self, _tree: &DirectoryNode) -> bool {
        false
    }

    /// Fatal install error, reported once per install.
    fn report_error(&mut self, message: &str) {
        log::error!("{message}");
    }

    /// Extraction progress in `0.0..=1.0`. Return `false` to cancel.
    fn update_progress(&mut self, _fraction: f32) -> bool {
        true
    }

    /// Name of the file currently being written.
    fn progress_file(&mut self, _name: &str) {}

    /// Error text from the archive backend while extracting. The install
    /// still ends with its own report afterwards.
    fn extraction_error(&mut self, message: &str) {
        log::warn!("{message}");
    }
}
