use crate::services::file_ops::MetaIni;
use crate::types::{InstallError, ModDetails, VersionInfo};
use std::path::Path;

pub const KEY_MOD_ID: &str = "modid";
pub const KEY_VERSION: &str = "version";
pub const KEY_NEWEST_VERSION: &str = "newestVersion";
pub const KEY_CATEGORY: &str = "category";
pub const KEY_INSTALLATION_FILE: &str = "installationFile";

/// Merge `details` into the sidecar `meta_file_name` inside `mod_dir`.
///
/// Stored values survive unless the new one is actually known: the id only
/// when non-zero, the version only when not older, the category never once
/// set. The installation file is always stamped.
pub fn reconcile_metadata(
    mod_dir: &Path,
    meta_file_name: &str,
    details: &ModDetails,
    installation_file: &str,
) -> Result<(), InstallError> {
    let path = mod_dir.join(meta_file_name);
    let mut meta = MetaIni::load(&path)
        .map_err(|e| InstallError::Metadata(format!("{}: {e}", path.display())))?;

    if details.mod_id != 0 || !meta.contains(KEY_MOD_ID) {
        meta.set(KEY_MOD_ID, details.mod_id);
    }

    let replace_version = match meta.get(KEY_VERSION) {
        None => true,
        Some(stored) => {
            !details.version.is_empty()
                && VersionInfo::parse(&details.version) >= VersionInfo::parse(stored)
        }
    };
    if replace_version {
        meta.set(KEY_VERSION, &details.version);
    }

    if !details.newest_version.is_empty() || !meta.contains(KEY_NEWEST_VERSION) {
        meta.set(KEY_NEWEST_VERSION, &details.newest_version);
    }

    if !meta.contains(KEY_CATEGORY) {
        meta.set(KEY_CATEGORY, details.category_id);
    }

    meta.set(KEY_INSTALLATION_FILE, installation_file);

    meta.save()
        .map_err(|e| InstallError::Metadata(format!("{}: {e}", path.display())))
}
