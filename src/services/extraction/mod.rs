//! Materialising archive entries on disk: into the mod directory, or into
//! scratch space for inspection by installer strategies.

pub mod orchestrator;
pub mod scratch;

pub use orchestrator::{extract_all, extract_one, extract_subset};
pub use scratch::ScratchFiles;

#[cfg(test)]
#[path = "tests/orchestrator_tests.rs"]
mod orchestrator_tests;
