//! Drives a backend's extraction and reports back through the decision
//! provider.

use super::scratch::ScratchFiles;
use crate::services::archive::{ArchiveBackend, CancelHandle, ExtractObserver};
use crate::services::decisions::DecisionProvider;
use crate::services::fs_utils::path_utils::{archive_base_name, canonicalize_archive_path};
use crate::types::{ArchiveError, InstallError};
use std::path::{Path, PathBuf};

/// Forwards backend events to the decision provider and turns a refused
/// progress update into a cancel request.
struct ProgressRelay<'a> {
    decisions: &'a mut dyn DecisionProvider,
    cancel: CancelHandle,
}

impl ExtractObserver for ProgressRelay<'_> {
    fn on_progress(&mut self, fraction: f32) {
        if !self.decisions.update_progress(fraction) && !self.cancel.is_cancelled() {
            log::info!("Extraction cancelled by user");
            self.cancel.cancel();
        }
    }

    fn on_file(&mut self, output_path: &str) {
        self.decisions.progress_file(output_path);
    }

    fn on_error(&mut self, message: &str) {
        log::error!("Extraction error: {message}");
        self.decisions.extraction_error(message);
    }
}

/// Extract everything currently flagged to `destination`.
pub fn extract_all(
    backend: &mut dyn ArchiveBackend,
    destination: &Path,
    decisions: &mut dyn DecisionProvider,
) -> Result<(), InstallError> {
    let mut relay = ProgressRelay {
        decisions,
        cancel: backend.cancel_handle(),
    };
    let result = backend.extract(destination, &mut relay);
    let cancelled = backend
        .last_error()
        .is_some_and(ArchiveError::is_cancelled);

    match result {
        Ok(()) => Ok(()),
        Err(e) if cancelled || e.is_cancelled() => Err(InstallError::Cancelled),
        Err(e) => Err(InstallError::Extraction(e)),
    }
}

/// Whether the archive path `entry_path` is what `requested` asks for.
/// Both sides are canonical and lower-case. A request without a directory
/// part also matches by base name.
fn matches_request(entry_path: &str, requested: &str) -> bool {
    entry_path == requested
        || (!requested.contains('/') && archive_base_name(entry_path) == requested)
}

/// Extract the first entry whose path matches `file_name` (ignoring case)
/// into `scratch_dir` under its base name.
///
/// `Ok(None)` when no entry matches.
pub fn extract_one(
    backend: &mut dyn ArchiveBackend,
    file_name: &str,
    scratch_dir: &Path,
    scratch: &mut ScratchFiles,
    decisions: &mut dyn DecisionProvider,
) -> Result<Option<PathBuf>, InstallError> {
    let wanted = canonicalize_archive_path(file_name).to_lowercase();
    let mut found = None;

    for entry in backend.entries_mut() {
        entry.skip = true;
        if found.is_none()
            && !entry.is_directory
            && matches_request(&canonicalize_archive_path(&entry.path).to_lowercase(), &wanted)
        {
            let base_name = archive_base_name(&entry.path).to_string();
            entry.skip = false;
            entry.output_path = base_name.clone();
            found = Some(base_name);
        }
    }

    let Some(base_name) = found else {
        log::debug!("No entry named {file_name} in archive");
        return Ok(None);
    };

    extract_all(backend, scratch_dir, decisions)?;
    let path = scratch_dir.join(base_name);
    scratch.record(path.clone());
    Ok(Some(path))
}

/// Extract every entry whose path matches one of `file_names` (ignoring
/// case) into `scratch_dir`, each under its base name.
///
/// Returns the extracted paths in the order of `file_names`, leaving out
/// names that matched nothing. Only the first entry matching a name is
/// extracted.
pub fn extract_subset(
    backend: &mut dyn ArchiveBackend,
    file_names: &[String],
    scratch_dir: &Path,
    scratch: &mut ScratchFiles,
    decisions: &mut dyn DecisionProvider,
) -> Result<Vec<PathBuf>, InstallError> {
    let wanted: Vec<String> = file_names
        .iter()
        .map(|name| canonicalize_archive_path(name).to_lowercase())
        .collect();
    let mut matched: Vec<Option<String>> = vec![None; wanted.len()];

    for entry in backend.entries_mut() {
        entry.skip = true;
        if entry.is_directory {
            continue;
        }
        let path = canonicalize_archive_path(&entry.path).to_lowercase();
        let position = wanted
            .iter()
            .position(|w| *w == path)
            .or_else(|| wanted.iter().position(|w| matches_request(&path, w)));
        if let Some(position) = position {
            if matched[position].is_some() {
                continue;
            }
            let base_name = archive_base_name(&entry.path).to_string();
            entry.skip = false;
            entry.output_path = base_name.clone();
            matched[position] = Some(base_name);
        }
    }

    if matched.iter().all(Option::is_none) {
        return Ok(Vec::new());
    }

    extract_all(backend, scratch_dir, decisions)?;

    let paths: Vec<PathBuf> = matched
        .into_iter()
        .flatten()
        .map(|base_name| scratch_dir.join(base_name))
        .collect();
    for path in &paths {
        scratch.record(path.clone());
    }
    Ok(paths)
}
