//! Guessing mod names, ids and versions from download file names.

use crate::services::fs_utils::file_utils::fix_directory_name;
use crate::types::{GuessQuality, GuessedValue};
use chrono::{DateTime, Local};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use std::time::SystemTime;

// <name>[-_ v<version>]-<mod id>[-<file version>...]
static DOWNLOAD_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^([A-Za-z0-9_'"\-.() ]*?)(?:[-_ ][VvRr]+[0-9]+(?:[._-][0-9]+){0,2}[ab]?)?-([1-9][0-9]+)(?:-.*)?$"#,
    )
    .expect("valid download name regex")
});
static SIMPLE_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z0-9_]+)").expect("valid simple name regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpretedName {
    pub name: String,
    pub mod_id: Option<i32>,
}

/// Split a download base name like `Better_Bodies-1234-2-1` into a readable
/// name and the mod id.
pub fn interpret_file_name(base_name: &str) -> InterpretedName {
    if let Some(caps) = DOWNLOAD_NAME_RE.captures(base_name) {
        let name = caps[1].replace('_', " ").trim().to_string();
        let mod_id = caps[2].parse::<i32>().ok();
        return InterpretedName { name, mod_id };
    }
    if let Some(caps) = SIMPLE_NAME_RE.captures(base_name) {
        log::debug!("simple expression matched, using name only");
        return InterpretedName {
            name: caps[1].to_string(),
            mod_id: None,
        };
    }
    InterpretedName {
        name: String::new(),
        mod_id: None,
    }
}

/// File name up to the first dot.
pub fn file_base_name(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    match name.split_once('.') {
        Some((base, _)) => base.to_string(),
        None => name,
    }
}

/// File name without its last extension.
pub fn file_complete_base_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Date-form version `d<year>.<month>.<day>` for files without a version.
pub fn version_stamp(modified: SystemTime) -> String {
    let local: DateTime<Local> = modified.into();
    local.format("d%Y.%-m.%-d").to_string()
}

/// Starting mod name for an install. A name given explicitly by the user
/// outranks every guess made from the archive.
pub fn initial_mod_name(explicit: Option<String>) -> GuessedValue<String> {
    let mut name: GuessedValue<String> = GuessedValue::default();
    name.set_filter(fix_directory_name);
    if let Some(explicit) = explicit {
        name.update(explicit, GuessQuality::User);
    }
    name
}
