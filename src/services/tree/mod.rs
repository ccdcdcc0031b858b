//! In-memory model of an archive's directory structure.

pub mod builder;
pub mod classifier;

pub use builder::{build_tree, map_to_archive, DirectoryNode, FileLeaf};
pub use classifier::{
    find_install_root, has_ini_tweaks, into_install_root, is_conventional_top_level,
    TopLevelRules,
};

#[cfg(test)]
#[path = "tests/builder_tests.rs"]
mod builder_tests;

#[cfg(test)]
#[path = "tests/classifier_tests.rs"]
mod classifier_tests;
