use super::*;
use crate::services::archive::{ArchiveBackend, ArchiveSession};
use crate::test_utils::{init_logger, FakeArchive, ScriptedDecisions};
use crate::types::InstallError;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn no_password() -> Option<String> {
    None
}

fn opened(paths: &[&str]) -> FakeArchive {
    init_logger();
    let mut archive = FakeArchive::new(paths);
    archive.open(Path::new("fake.zip"), &mut no_password).unwrap();
    archive
}

#[test]
fn test_extract_subset_matches_requested_files_only() {
    let tmp = TempDir::new().unwrap();
    let mut archive = opened(&["sub/a.txt", "other/b.txt", "unrelated.txt", "sub/c.txt"]);
    let mut scratch = ScratchFiles::new();
    let mut decisions = ScriptedDecisions::new();

    let paths = extract_subset(
        &mut archive,
        &["b.txt".to_string(), "A.TXT".to_string()],
        tmp.path(),
        &mut scratch,
        &mut decisions,
    )
    .unwrap();

    assert_eq!(paths, vec![tmp.path().join("b.txt"), tmp.path().join("a.txt")]);
    assert_eq!(fs::read_to_string(&paths[1]).unwrap(), "content of sub/a.txt");

    let entries = archive.entries();
    assert!(!entries[0].skip && !entries[1].skip);
    assert!(entries[2].skip && entries[3].skip, "Unrelated entries stay skipped");
    assert!(scratch.contains(&paths[0]) && scratch.contains(&paths[1]));
}

#[test]
fn test_extract_subset_by_full_path() {
    let tmp = TempDir::new().unwrap();
    let mut archive = opened(&["Sub/A.txt", "other/a.txt"]);
    let mut scratch = ScratchFiles::new();

    let paths = extract_subset(
        &mut archive,
        &["\\other\\A.TXT".to_string(), "missing/x.txt".to_string()],
        tmp.path(),
        &mut scratch,
        &mut ScriptedDecisions::new(),
    )
    .unwrap();

    assert_eq!(paths, vec![tmp.path().join("a.txt")]);
    assert_eq!(fs::read_to_string(&paths[0]).unwrap(), "content of other/a.txt");
    assert!(archive.entries()[0].skip);
}

#[test]
fn test_extract_subset_without_matches_extracts_nothing() {
    let tmp = TempDir::new().unwrap();
    let mut archive = opened(&["a.txt"]);
    let log = archive.log();

    let paths = extract_subset(
        &mut archive,
        &["zzz.txt".to_string()],
        tmp.path(),
        &mut ScratchFiles::new(),
        &mut ScriptedDecisions::new(),
    )
    .unwrap();

    assert!(paths.is_empty());
    assert!(log.borrow().extracted.is_empty());
}

#[test]
fn test_extract_one_flags_single_entry() {
    let tmp = TempDir::new().unwrap();
    let mut archive = opened(&["fomod/", "fomod/ModuleConfig.xml", "data/ModuleConfig.xml"]);
    let mut scratch = ScratchFiles::new();

    let path = extract_one(
        &mut archive,
        "FOMOD/moduleconfig.xml",
        tmp.path(),
        &mut scratch,
        &mut ScriptedDecisions::new(),
    )
    .unwrap()
    .unwrap();

    assert_eq!(path, tmp.path().join("ModuleConfig.xml"));
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "content of fomod/ModuleConfig.xml"
    );
    let flagged: Vec<bool> = archive.entries().iter().map(|e| !e.skip).collect();
    assert_eq!(flagged, vec![false, true, false]);
    assert_eq!(scratch.take_paths(), vec![path]);
    assert!(scratch.is_empty());
}

#[test]
fn test_extract_one_missing_file() {
    let tmp = TempDir::new().unwrap();
    let mut archive = opened(&["a.txt"]);

    let result = extract_one(
        &mut archive,
        "b.txt",
        tmp.path(),
        &mut ScratchFiles::new(),
        &mut ScriptedDecisions::new(),
    )
    .unwrap();
    assert!(result.is_none());
}

#[test]
fn test_refused_progress_cancels_extraction() {
    let tmp = TempDir::new().unwrap();
    let mut archive = opened(&["a.txt", "b.txt"]);
    for entry in archive.entries_mut() {
        entry.skip = false;
    }
    let mut decisions = ScriptedDecisions {
        cancel_extraction: true,
        ..Default::default()
    };

    let result = extract_all(&mut archive, tmp.path(), &mut decisions);

    assert!(matches!(result, Err(InstallError::Cancelled)));
    assert!(!tmp.path().join("a.txt").exists());
}

#[test]
fn test_backend_failure_is_extraction_error() {
    let tmp = TempDir::new().unwrap();
    let mut archive = opened(&["a.txt"]);
    archive.entries_mut()[0].skip = false;
    archive.entries_mut()[0].output_path = "../escape.txt".into();

    let mut decisions = ScriptedDecisions::new();

    let result = extract_all(&mut archive, tmp.path(), &mut decisions);

    assert!(matches!(result, Err(InstallError::Extraction(_))));
    assert_eq!(decisions.extraction_errors.len(), 1, "Backend text reaches the provider");
    assert!(decisions.errors.is_empty());
}

#[test]
fn test_progress_files_reach_decision_provider() {
    let tmp = TempDir::new().unwrap();
    let mut archive = opened(&["a.txt", "b.txt"]);
    for entry in archive.entries_mut() {
        entry.skip = false;
    }
    let mut decisions = ScriptedDecisions::new();

    extract_all(&mut archive, tmp.path(), &mut decisions).unwrap();
    assert_eq!(decisions.files, vec!["a.txt".to_string(), "b.txt".to_string()]);
}

#[test]
fn test_scratch_cleanup_removes_recorded_files() {
    let tmp = TempDir::new().unwrap();
    let file = tmp.path().join("preview.png");
    let dir = tmp.path().join("unpacked");
    fs::write(&file, "x").unwrap();
    fs::create_dir_all(dir.join("inner")).unwrap();

    let mut scratch = ScratchFiles::new();
    scratch.record(file.clone());
    scratch.record(dir.clone());
    scratch.record(tmp.path().join("never-written"));
    scratch.cleanup();

    assert!(!file.exists());
    assert!(!dir.exists());
    assert!(scratch.is_empty());
}

#[test]
fn test_session_guard_closes_fake_backend() {
    init_logger();
    let mut archive = FakeArchive::new(&["a.txt"]);
    let log = archive.log();
    {
        let (session, result) =
            ArchiveSession::open(&mut archive, Path::new("fake.zip"), &mut no_password);
        result.unwrap();
        assert_eq!(session.entries().len(), 1);
    }
    assert_eq!(log.borrow().opened, 1);
    assert_eq!(log.borrow().closed, 1);
}

#[test]
fn test_extract_subset_takes_first_of_same_named_files() {
    let tmp = TempDir::new().unwrap();
    let mut archive = opened(&["x/readme.txt", "y/readme.txt"]);
    let mut scratch = ScratchFiles::new();

    let paths = extract_subset(
        &mut archive,
        &["readme.txt".to_string()],
        tmp.path(),
        &mut scratch,
        &mut ScriptedDecisions::new(),
    )
    .unwrap();

    assert_eq!(paths, vec![tmp.path().join("readme.txt")]);
    assert_eq!(fs::read_to_string(&paths[0]).unwrap(), "content of x/readme.txt");
    let flagged: Vec<bool> = archive.entries().iter().map(|e| !e.skip).collect();
    assert_eq!(flagged, vec![true, false]);
}
