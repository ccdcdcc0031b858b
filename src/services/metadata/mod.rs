//! Mod metadata: where it comes from before the install and how it is
//! merged into the installed mod afterwards.

pub mod categories;
pub mod companion;
pub mod naming;
pub mod reconcile;

pub use categories::{CategoryMap, CategoryResolver};
pub use companion::{companion_path, gather_details};
pub use naming::{initial_mod_name, interpret_file_name, version_stamp, InterpretedName};
pub use reconcile::reconcile_metadata;

#[cfg(test)]
#[path = "tests/naming_tests.rs"]
mod naming_tests;

#[cfg(test)]
#[path = "tests/companion_tests.rs"]
mod companion_tests;

#[cfg(test)]
#[path = "tests/reconcile_tests.rs"]
mod reconcile_tests;
