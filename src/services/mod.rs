pub mod archive;
pub mod config;
pub mod decisions;
pub mod extraction;
pub mod file_ops;
pub mod fs_utils;
pub mod installer;
pub mod metadata;
pub mod overwrite;
pub mod tree;
