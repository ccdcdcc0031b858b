//! Collect what is known about a mod before its archive is opened: the file
//! name, the `.meta` file a download tool may have left next to it, and the
//! archive's modification date.

use super::categories::CategoryResolver;
use super::naming::{file_base_name, file_complete_base_name, interpret_file_name, version_stamp};
use crate::services::file_ops::MetaIni;
use crate::services::fs_utils::file_utils::fix_directory_name;
use crate::types::{GuessQuality, ModDetails};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static HTML_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid html tag regex"));

/// `<archive>.meta`
pub fn companion_path(archive: &Path) -> PathBuf {
    let mut name = archive.as_os_str().to_owned();
    name.push(".meta");
    PathBuf::from(name)
}

/// Download portals store the display name as HTML.
fn html_to_plain(text: &str) -> String {
    HTML_TAG_RE
        .replace_all(text, "")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
        .trim()
        .to_string()
}

/// Fill `details` from everything available about `archive` without
/// opening it. The name only improves when a source is at least as
/// trustworthy as what `details` already holds.
pub fn gather_details(
    archive: &Path,
    details: &mut ModDetails,
    categories: &dyn CategoryResolver,
) -> std::io::Result<()> {
    details.name.set_filter(fix_directory_name);
    details
        .name
        .update(file_complete_base_name(archive), GuessQuality::Fallback);

    let meta = MetaIni::load(&companion_path(archive))?;
    details.mod_id = meta
        .get_int("modID")
        .and_then(|id| i32::try_from(id).ok())
        .unwrap_or(0);
    details.name.update(
        html_to_plain(meta.get("name").unwrap_or_default()),
        GuessQuality::Fallback,
    );
    details.name.update(
        meta.get("modName").unwrap_or_default().to_string(),
        GuessQuality::Meta,
    );
    details.version = meta.get("version").unwrap_or_default().to_string();
    details.newest_version = meta.get("newestVersion").unwrap_or_default().to_string();

    let external_category = meta
        .get_int("category")
        .and_then(|id| u32::try_from(id).ok())
        .unwrap_or(0);
    details.category_id = categories.resolve_external_id(external_category);

    if details.version.is_empty() {
        let modified = fs::metadata(archive)?.modified()?;
        details.version = version_stamp(modified);
    }

    let guessed = interpret_file_name(&file_base_name(archive));
    match guessed.mod_id {
        Some(id) if details.mod_id == 0 => details.mod_id = id,
        Some(id) if id != details.mod_id => {
            log::debug!("passed mod id: {}, guessed id: {id}", details.mod_id)
        }
        _ => {}
    }
    details.name.update(guessed.name, GuessQuality::Good);

    log::debug!(
        "using mod name \"{}\" (id {})",
        details.name.value(),
        details.mod_id
    );
    Ok(())
}
