//! Installs mod archives into a mods directory: opens the archive, picks an
//! installer strategy, resolves clashes with existing mods, extracts, and
//! records metadata next to the installed files.

pub mod services;
pub mod types;
#[cfg(test)]
pub mod test_utils;

pub use services::installer::{InstallReport, InstallationManager};
