use std::fs;
use std::path::{Path, PathBuf};

/// Copy the whole tree under `from` into a new directory `to`.
///
/// `to` must not exist yet. The copy refuses to overwrite anything so a
/// half-written backup never clobbers an older one.
pub fn copy_dir_recursive(from: &Path, to: &Path) -> std::io::Result<()> {
    if !from.is_dir() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Source directory does not exist: {}", from.display()),
        ));
    }
    fs::create_dir(to)?;

    let mut options = fs_extra::dir::CopyOptions::new();
    options.content_only = true;
    options.overwrite = false;

    fs_extra::dir::copy(from, to, &options)
        .map(|_| ())
        .map_err(|err| std::io::Error::other(err.to_string()))
}

/// First free sibling of `directory` named `<name>_backup`, `<name>_backup2`,
/// `<name>_backup3`, ...
pub fn generate_backup_name(directory: &Path) -> PathBuf {
    let base_name = directory
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let parent = directory.parent().unwrap_or_else(|| Path::new(""));

    let mut candidate = parent.join(format!("{base_name}_backup"));
    let mut counter = 2u32;
    while candidate.exists() {
        candidate = parent.join(format!("{base_name}_backup{counter}"));
        counter += 1;
    }
    candidate
}

/// Turn an arbitrary string into something usable as a mod directory name.
///
/// Drops characters the filesystem rejects, trims surrounding whitespace and
/// trailing dots. Returns `None` when nothing usable is left.
#[allow(clippy::ptr_arg)]
pub fn fix_directory_name(name: &String) -> Option<String> {
    let sanitized = sanitize_filename::sanitize(name.trim());
    let fixed = sanitized
        .trim()
        .trim_end_matches(|c: char| c == '.' || c.is_whitespace())
        .to_string();
    if fixed.is_empty() {
        None
    } else {
        Some(fixed)
    }
}

/// Write `content` next to `path` first, then move it into place.
pub fn atomic_write(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let file_name = path
        .file_name()
        .ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Invalid file path: {}", path.display()),
            )
        })?
        .to_string_lossy();
    let tmp_path = path.with_file_name(format!("{file_name}.tmp"));

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&tmp_path, content)?;

    if let Err(e) = fs::rename(&tmp_path, path) {
        // Some platforms refuse to rename onto an existing file.
        log::warn!(
            "Rename onto {} failed ({e}), removing target first",
            path.display()
        );
        if path.exists() {
            fs::remove_file(path)?;
        }
        fs::rename(&tmp_path, path)?;
    }
    Ok(())
}
