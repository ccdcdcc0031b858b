use super::guessed_value::{GuessQuality, GuessedValue};

/// Everything known about the mod being installed, gathered from the file
/// name, the companion `.meta` file and the installer strategies.
#[derive(Debug, Clone, Default)]
pub struct ModDetails {
    pub name: GuessedValue<String>,
    /// Remote mod id, 0 when unknown.
    pub mod_id: i32,
    pub version: String,
    pub newest_version: String,
    /// Internal category id, 0 when unknown.
    pub category_id: i32,
}

impl ModDetails {
    pub fn named(name: impl Into<String>, quality: GuessQuality) -> Self {
        Self {
            name: GuessedValue::new(name.into(), quality),
            ..Self::default()
        }
    }
}
