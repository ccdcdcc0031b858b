//! Installer strategies and the manager that tries them in turn.

pub mod manager;
pub mod manual;
pub mod plugin;
pub mod quick;

pub use manager::{InstallReport, InstallationManager, BASE_EXTENSIONS};
pub use manual::{ManualInstaller, MANUAL_INSTALLER_PRIORITY};
pub use plugin::{
    CustomInstaller, InstallContext, InstallOutcome, Installer, InstallerPlugin, SimpleInstaller,
};
pub use quick::{QuickInstaller, QUICK_INSTALLER_PRIORITY};

#[cfg(test)]
#[path = "tests/strategies_tests.rs"]
mod strategies_tests;

#[cfg(test)]
#[path = "tests/manager_tests.rs"]
mod manager_tests;
