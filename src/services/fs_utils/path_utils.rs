use std::path::{Component, Path, PathBuf};

/// Validates that the `target_path` stays inside whatever base it is joined to.
/// Rejects `..` climbing above the start as well as absolute paths and prefixes.
pub fn is_path_safe(target_path: &Path) -> bool {
    let mut depth: i32 = 0;
    for component in target_path.components() {
        match component {
            Component::ParentDir => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            Component::Normal(_) => depth += 1,
            Component::CurDir => {}
            Component::RootDir | Component::Prefix(_) => return false,
        }
    }
    true
}

/// Join an archive-relative, `/`-separated path onto `base_path`, refusing
/// anything that would land outside of it.
pub fn resolve_safe_path(base_path: &Path, relative: &str) -> std::io::Result<PathBuf> {
    let target: PathBuf = relative
        .split(['/', '\\'])
        .filter(|segment| !segment.is_empty())
        .collect();
    if relative.starts_with(['/', '\\']) || !is_path_safe(&target) {
        return Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            format!("Path escapes the destination directory: {relative}"),
        ));
    }
    Ok(base_path.join(target))
}

/// Strip one leading separator and convert to `/` separators, the form archive
/// entry paths are compared in.
pub fn canonicalize_archive_path(name: &str) -> String {
    let stripped = name
        .strip_prefix('/')
        .or_else(|| name.strip_prefix('\\'))
        .unwrap_or(name);
    stripped.replace('\\', "/")
}

/// Last `/` or `\` separated segment.
pub fn archive_base_name(path: &str) -> &str {
    match path.rfind(['/', '\\']) {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}
