use super::plugin::{InstallOutcome, Installer, SimpleInstaller};
use crate::services::decisions::DecisionProvider;
use crate::services::tree::DirectoryNode;
use crate::types::{InstallerError, ModDetails};

pub const MANUAL_INSTALLER_PRIORITY: i32 = 0;

/// Last resort: let the user confirm the archive layout as-is.
#[derive(Debug, Default)]
pub struct ManualInstaller;

impl Installer for ManualInstaller {
    fn name(&self) -> &str {
        "Manual Installer"
    }

    fn priority(&self) -> i32 {
        MANUAL_INSTALLER_PRIORITY
    }

    fn is_manual_installer(&self) -> bool {
        true
    }

    fn is_archive_supported(&self, _tree: &DirectoryNode) -> bool {
        true
    }
}

impl SimpleInstaller for ManualInstaller {
    fn install(
        &mut self,
        details: &mut ModDetails,
        tree: &mut DirectoryNode,
        decisions: &mut dyn DecisionProvider,
    ) -> Result<InstallOutcome, InstallerError> {
        if tree.is_empty() {
            return Err(InstallerError::Incompatible("archive is empty".into()));
        }
        if decisions.confirm_manual_install(tree) {
            log::info!("Installing \"{}\" as laid out in the archive", details.name.value());
            Ok(InstallOutcome::Success)
        } else {
            Ok(InstallOutcome::Canceled)
        }
    }
}
