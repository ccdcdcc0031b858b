use super::path_utils::*;
use std::path::Path;

#[test]
fn test_is_path_safe() {
    assert!(is_path_safe(Path::new("meshes/armor/body.nif")));
    assert!(is_path_safe(Path::new("a/../b")));
    assert!(!is_path_safe(Path::new("../outside")));
    assert!(!is_path_safe(Path::new("a/../../outside")));
}

#[test]
fn test_resolve_safe_path() {
    let base = Path::new("/mods/Target");
    assert_eq!(
        resolve_safe_path(base, "textures\\sky.dds").unwrap(),
        base.join("textures").join("sky.dds")
    );
    assert!(resolve_safe_path(base, "/etc/passwd").is_err());
    assert!(resolve_safe_path(base, "..\\..\\evil.dll").is_err());
}

#[test]
fn test_canonicalize_archive_path() {
    assert_eq!(canonicalize_archive_path("/Data/a.txt"), "Data/a.txt");
    assert_eq!(canonicalize_archive_path("\\Data\\a.txt"), "Data/a.txt");
    assert_eq!(canonicalize_archive_path("plain.txt"), "plain.txt");
}

#[test]
fn test_archive_base_name() {
    assert_eq!(archive_base_name("sub/dir/a.txt"), "a.txt");
    assert_eq!(archive_base_name("sub\\b.txt"), "b.txt");
    assert_eq!(archive_base_name("root.txt"), "root.txt");
}
