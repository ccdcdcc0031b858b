use super::plugin::{InstallOutcome, Installer, SimpleInstaller};
use crate::services::decisions::DecisionProvider;
use crate::services::tree::{find_install_root, into_install_root, DirectoryNode, TopLevelRules};
use crate::types::{InstallerError, ModDetails};

pub const QUICK_INSTALLER_PRIORITY: i32 = 50;

/// Installs archives whose data directory is obvious, dropping wrapper
/// folders above it.
pub struct QuickInstaller {
    rules: TopLevelRules,
}

impl QuickInstaller {
    pub fn new(rules: TopLevelRules) -> Self {
        Self { rules }
    }
}

impl Installer for QuickInstaller {
    fn name(&self) -> &str {
        "Quick Installer"
    }

    fn priority(&self) -> i32 {
        QUICK_INSTALLER_PRIORITY
    }

    fn is_archive_supported(&self, tree: &DirectoryNode) -> bool {
        find_install_root(tree, &self.rules).is_some()
    }
}

impl SimpleInstaller for QuickInstaller {
    fn install(
        &mut self,
        _details: &mut ModDetails,
        tree: &mut DirectoryNode,
        _decisions: &mut dyn DecisionProvider,
    ) -> Result<InstallOutcome, InstallerError> {
        if find_install_root(tree, &self.rules).is_none() {
            return Ok(InstallOutcome::NotAttempted);
        }
        let root = into_install_root(std::mem::take(tree), &self.rules)
            .ok_or_else(|| InstallerError::Failed("install root disappeared".into()))?;
        *tree = root;
        Ok(InstallOutcome::Success)
    }
}
