use std::collections::HashMap;

/// Translates category ids from download metadata into local category ids.
pub trait CategoryResolver {
    /// Local id for `external_id`, 0 when unknown.
    fn resolve_external_id(&self, external_id: u32) -> i32;
}

/// Table-driven resolver.
#[derive(Debug, Clone, Default)]
pub struct CategoryMap {
    by_external: HashMap<u32, i32>,
}

impl CategoryMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, external_id: u32, category_id: i32) {
        self.by_external.insert(external_id, category_id);
    }
}

impl FromIterator<(u32, i32)> for CategoryMap {
    fn from_iter<I: IntoIterator<Item = (u32, i32)>>(iter: I) -> Self {
        Self {
            by_external: iter.into_iter().collect(),
        }
    }
}

impl CategoryResolver for CategoryMap {
    fn resolve_external_id(&self, external_id: u32) -> i32 {
        if external_id == 0 {
            return 0;
        }
        self.by_external.get(&external_id).copied().unwrap_or(0)
    }
}
