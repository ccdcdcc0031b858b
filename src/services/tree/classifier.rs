//! Decides whether an archive tree already looks like a data directory, and
//! where its real root is when the author wrapped it in extra folders.

use super::builder::DirectoryNode;
use crate::services::config::InstallerSettings;

/// Names and extensions that mark a directory as a valid install root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopLevelRules {
    directories: Vec<String>,
    suffixes: Vec<String>,
}

impl TopLevelRules {
    pub fn new<D, S>(directories: D, suffixes: S) -> Self
    where
        D: IntoIterator,
        D::Item: AsRef<str>,
        S: IntoIterator,
        S::Item: AsRef<str>,
    {
        Self {
            directories: directories
                .into_iter()
                .map(|d| d.as_ref().to_lowercase())
                .collect(),
            suffixes: suffixes
                .into_iter()
                .map(|s| s.as_ref().trim_start_matches('.').to_lowercase())
                .collect(),
        }
    }

    pub fn from_settings(settings: &InstallerSettings) -> Self {
        Self::new(&settings.top_level_directories, &settings.top_level_suffixes)
    }

    pub fn is_top_level_directory(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        self.directories.iter().any(|d| *d == lower)
    }

    pub fn is_top_level_file(&self, name: &str) -> bool {
        match name.rsplit_once('.') {
            Some((_, ext)) => {
                let lower = ext.to_lowercase();
                self.suffixes.iter().any(|s| *s == lower)
            }
            None => false,
        }
    }
}

impl Default for TopLevelRules {
    fn default() -> Self {
        Self::from_settings(&InstallerSettings::default())
    }
}

/// True if `node` directly contains a recognised data directory or file.
pub fn is_conventional_top_level(node: &DirectoryNode, rules: &TopLevelRules) -> bool {
    node.nodes
        .iter()
        .any(|child| rules.is_top_level_directory(&child.name))
        || node
            .leaves
            .iter()
            .any(|leaf| rules.is_top_level_file(&leaf.name))
}

/// Walk down through single-folder wrappers until a conventional layout
/// shows up. `None` when the structure is ambiguous.
pub fn find_install_root<'a>(
    tree: &'a DirectoryNode,
    rules: &TopLevelRules,
) -> Option<&'a DirectoryNode> {
    let mut current = tree;
    loop {
        if is_conventional_top_level(current, rules) {
            return Some(current);
        }
        match (current.leaves.is_empty(), current.nodes.as_slice()) {
            (true, [only]) => current = only,
            _ => {
                log::debug!("not a simple archive");
                return None;
            }
        }
    }
}

/// Owned variant of [`find_install_root`]: the returned node becomes a new
/// root (empty name, no entry of its own).
pub fn into_install_root(tree: DirectoryNode, rules: &TopLevelRules) -> Option<DirectoryNode> {
    let mut current = tree;
    loop {
        if is_conventional_top_level(&current, rules) {
            current.name.clear();
            current.index = None;
            return Some(current);
        }
        if current.leaves.is_empty() && current.nodes.len() == 1 {
            current = current.nodes.pop()?;
        } else {
            log::debug!("not a simple archive");
            return None;
        }
    }
}

/// True if the tree carries optional INI tweaks: a top-level directory named
/// exactly `directory_name` holding at least one file.
pub fn has_ini_tweaks(tree: &DirectoryNode, directory_name: &str) -> bool {
    tree.find_node(directory_name)
        .is_some_and(|node| !node.leaves.is_empty())
}
