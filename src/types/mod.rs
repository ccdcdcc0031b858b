pub mod errors;
pub mod guessed_value;
pub mod mod_details;
pub mod version;

pub use errors::{ArchiveError, InstallError, InstallResult, InstallerError};
pub use guessed_value::{GuessQuality, GuessedValue};
pub use mod_details::ModDetails;
pub use version::VersionInfo;

#[cfg(test)]
#[path = "tests/errors_tests.rs"]
mod errors_tests;

#[cfg(test)]
#[path = "tests/guessed_value_tests.rs"]
mod guessed_value_tests;
