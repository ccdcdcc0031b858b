//! Installer strategies and what the installation manager offers them.

use crate::services::decisions::DecisionProvider;
use crate::services::tree::DirectoryNode;
use crate::types::{InstallError, InstallerError, ModDetails};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Result of one install attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstallOutcome {
    NotAttempted,
    Success,
    Failed,
    Canceled,
    /// The strategy wants the user to arrange the files by hand.
    ManualRequested,
}

/// Properties shared by every strategy.
pub trait Installer {
    fn name(&self) -> &str;

    /// Higher runs first.
    fn priority(&self) -> i32;

    fn is_active(&self) -> bool {
        true
    }

    /// Only considered after another strategy requested manual installation.
    fn is_manual_installer(&self) -> bool {
        false
    }

    /// Whether the archive's structure is something this strategy handles.
    fn is_archive_supported(&self, tree: &DirectoryNode) -> bool;
}

/// Works on the archive tree and marks what to install; the manager does
/// the extraction.
///
/// On `Success` the (possibly rearranged) `tree` is what gets installed.
pub trait SimpleInstaller: Installer {
    fn install(
        &mut self,
        details: &mut ModDetails,
        tree: &mut DirectoryNode,
        decisions: &mut dyn DecisionProvider,
    ) -> Result<InstallOutcome, InstallerError>;
}

/// Takes care of its own extraction, using the manager through
/// [`InstallContext`].
pub trait CustomInstaller: Installer {
    /// Archive extensions, without the dot, this strategy adds to the set
    /// the manager accepts.
    fn supported_extensions(&self) -> Vec<String>;

    /// Used when the archive could not be opened and there is no tree.
    fn is_file_supported(&self, archive: &Path) -> bool;

    fn install(
        &mut self,
        details: &mut ModDetails,
        archive: &Path,
        context: &mut dyn InstallContext,
    ) -> Result<InstallOutcome, InstallerError>;
}

/// Services the installation manager provides to custom strategies while
/// an install runs.
pub trait InstallContext {
    fn mods_directory(&self) -> &Path;

    /// Archive currently being installed.
    fn current_archive(&self) -> &Path;

    /// Tree of the open archive, if it could be opened.
    fn archive_tree(&self) -> Option<&DirectoryNode>;

    fn decisions(&mut self) -> &mut dyn DecisionProvider;

    /// Extract one file to scratch space. `Ok(None)` when it is not in the
    /// archive.
    fn extract_file(&mut self, file_name: &str) -> Result<Option<PathBuf>, InstallError>;

    /// Extract several files to scratch space, in request order.
    fn extract_files(&mut self, file_names: &[String]) -> Result<Vec<PathBuf>, InstallError>;

    /// Run the regular overwrite, extraction and metadata steps for `tree`,
    /// which must be built from the open archive.
    fn install_tree(
        &mut self,
        details: &mut ModDetails,
        tree: DirectoryNode,
    ) -> Result<InstallOutcome, InstallError>;
}

/// A registered strategy.
pub enum InstallerPlugin {
    Simple(Box<dyn SimpleInstaller>),
    Custom(Box<dyn CustomInstaller>),
}

impl InstallerPlugin {
    pub fn name(&self) -> &str {
        match self {
            Self::Simple(installer) => installer.name(),
            Self::Custom(installer) => installer.name(),
        }
    }

    pub fn priority(&self) -> i32 {
        match self {
            Self::Simple(installer) => installer.priority(),
            Self::Custom(installer) => installer.priority(),
        }
    }

    pub fn is_active(&self) -> bool {
        match self {
            Self::Simple(installer) => installer.is_active(),
            Self::Custom(installer) => installer.is_active(),
        }
    }

    pub fn is_manual_installer(&self) -> bool {
        match self {
            Self::Simple(installer) => installer.is_manual_installer(),
            Self::Custom(installer) => installer.is_manual_installer(),
        }
    }

    /// Whether this strategy should be tried. Without a tree only custom
    /// strategies that accept the raw file qualify.
    pub fn accepts(&self, tree: Option<&DirectoryNode>, archive: &Path) -> bool {
        match (self, tree) {
            (Self::Simple(installer), Some(tree)) => installer.is_archive_supported(tree),
            (Self::Simple(_), None) => false,
            (Self::Custom(installer), Some(tree)) => installer.is_archive_supported(tree),
            (Self::Custom(installer), None) => installer.is_file_supported(archive),
        }
    }

    pub fn supported_extensions(&self) -> Vec<String> {
        match self {
            Self::Simple(_) => Vec::new(),
            Self::Custom(installer) => installer.supported_extensions(),
        }
    }
}

impl std::fmt::Debug for InstallerPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            Self::Simple(_) => "Simple",
            Self::Custom(_) => "Custom",
        };
        f.debug_struct("InstallerPlugin")
            .field("kind", &kind)
            .field("name", &self.name())
            .field("priority", &self.priority())
            .finish()
    }
}
