use crate::services::archive::{ArchiveEntry, ARCHIVE_SEPARATOR};

/// A file inside a [`DirectoryNode`], pointing back at its archive entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileLeaf {
    pub name: String,
    pub index: usize,
}

/// One directory of the archive, owning everything below it.
///
/// The root has an empty name. `index` is set when the archive listed the
/// directory itself rather than only files inside it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryNode {
    pub name: String,
    pub index: Option<usize>,
    pub nodes: Vec<DirectoryNode>,
    pub leaves: Vec<FileLeaf>,
}

impl DirectoryNode {
    pub fn new(name: impl Into<String>, index: Option<usize>) -> Self {
        Self {
            name: name.into(),
            index,
            nodes: Vec::new(),
            leaves: Vec::new(),
        }
    }

    pub fn find_node(&self, name: &str) -> Option<&DirectoryNode> {
        self.nodes.iter().find(|node| node.name == name)
    }

    pub fn find_leaf(&self, name: &str) -> Option<&FileLeaf> {
        self.leaves.iter().find(|leaf| leaf.name == name)
    }

    /// Follow `/`-separated `path` down from this node to a file.
    pub fn find_file(&self, path: &str) -> Option<&FileLeaf> {
        let (dirs, file) = match path.rsplit_once(ARCHIVE_SEPARATOR) {
            Some((dirs, file)) => (Some(dirs), file),
            None => (None, path),
        };
        let mut current = self;
        if let Some(dirs) = dirs {
            for segment in dirs.split(ARCHIVE_SEPARATOR) {
                current = current.find_node(segment)?;
            }
        }
        current.find_leaf(file)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.leaves.is_empty()
    }

    /// Number of files anywhere below this node.
    pub fn file_count(&self) -> usize {
        self.leaves.len() + self.nodes.iter().map(DirectoryNode::file_count).sum::<usize>()
    }

    fn child_mut_or_insert(&mut self, name: &str) -> &mut DirectoryNode {
        let position = match self.nodes.iter().position(|node| node.name == name) {
            Some(position) => position,
            None => {
                self.nodes.push(DirectoryNode::new(name, None));
                self.nodes.len() - 1
            }
        };
        &mut self.nodes[position]
    }
}

/// Group the flat entry list into a directory tree.
pub fn build_tree(entries: &[ArchiveEntry]) -> DirectoryNode {
    let mut root = DirectoryNode::default();

    for entry in entries {
        let segments: Vec<&str> = entry.path.split(ARCHIVE_SEPARATOR).collect();
        let last = segments.len() - 1;
        let mut current = &mut root;

        for (position, segment) in segments.iter().enumerate() {
            // A trailing separator means the directory was already added above.
            if segment.is_empty() {
                break;
            }
            if position < last {
                current = current.child_mut_or_insert(segment);
            } else if entry.is_directory {
                let node = current.child_mut_or_insert(segment);
                node.index = Some(entry.index);
            } else {
                current.leaves.push(FileLeaf {
                    name: (*segment).to_string(),
                    index: entry.index,
                });
            }
        }
    }

    root
}

/// Flag every entry reachable from `tree` for extraction at its position in
/// the tree, and everything else as skipped.
pub fn map_to_archive(tree: &DirectoryNode, entries: &mut [ArchiveEntry]) {
    for entry in entries.iter_mut() {
        entry.skip = true;
    }
    map_node(tree, "", entries);
}

fn map_node(node: &DirectoryNode, prefix: &str, entries: &mut [ArchiveEntry]) {
    let join = |name: &str| {
        if prefix.is_empty() {
            name.to_string()
        } else {
            format!("{prefix}{ARCHIVE_SEPARATOR}{name}")
        }
    };

    for leaf in &node.leaves {
        include(entries, leaf.index, join(&leaf.name));
    }
    for child in &node.nodes {
        let path = join(&child.name);
        if let Some(index) = child.index {
            include(entries, index, path.clone());
        }
        map_node(child, &path, entries);
    }
}

fn include(entries: &mut [ArchiveEntry], index: usize, output_path: String) {
    match entries.get_mut(index) {
        Some(entry) => {
            entry.skip = false;
            entry.output_path = output_path;
        }
        None => log::warn!("Tree refers to missing archive entry {index}"),
    }
}
