use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn default_top_level_directories() -> Vec<String> {
    [
        "fonts",
        "interface",
        "menus",
        "meshes",
        "music",
        "scripts",
        "shaders",
        "sound",
        "strings",
        "textures",
        "trees",
        "video",
        "facegen",
        "materials",
        "skse",
        "obse",
        "nvse",
        "fose",
        "distantlod",
        "asi",
        "lodsettings",
        "dialogueviews",
        "seq",
        "grass",
        "sky",
    ]
    .iter()
    .map(|name| name.to_string())
    .collect()
}

fn default_top_level_suffixes() -> Vec<String> {
    ["esp", "esm", "esl", "bsa", "ba2", "modgroups"]
        .iter()
        .map(|suffix| suffix.to_string())
        .collect()
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct InstallerSettings {
    /// Where installed mods live, one directory per mod.
    pub mods_directory: PathBuf,
    /// Root for single-file and subset extraction.
    pub scratch_directory: PathBuf,
    /// Directory names that mark a sane install root (case-insensitive).
    pub top_level_directories: Vec<String>,
    /// File extensions that mark a sane install root, without the dot.
    pub top_level_suffixes: Vec<String>,
    pub ini_tweaks_directory: String,
    /// Sidecar written into every installed mod.
    pub meta_file_name: String,
    pub password_attempts: usize,
    pub replace_retry_delay_ms: u64,
}

impl Default for InstallerSettings {
    fn default() -> Self {
        Self {
            mods_directory: PathBuf::from("mods"),
            scratch_directory: std::env::temp_dir(),
            top_level_directories: default_top_level_directories(),
            top_level_suffixes: default_top_level_suffixes(),
            ini_tweaks_directory: "INI Tweaks".into(),
            meta_file_name: "meta.ini".into(),
            password_attempts: 3,
            replace_retry_delay_ms: 100,
        }
    }
}
