//! Making room for a mod directory that may already exist.

use crate::services::decisions::{DecisionProvider, OverwriteAction, PromptReason};
use crate::services::fs_utils::file_utils::{copy_dir_recursive, generate_backup_name};
use crate::types::{GuessQuality, GuessedValue, InstallError};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

/// How the target directory came to be ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetState {
    /// Did not exist and was created.
    Created,
    /// Existed; content removed, sidecar kept.
    Replaced,
    /// Existed and is extracted into as-is.
    Merged,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    pub directory: PathBuf,
    pub state: TargetState,
}

/// Options that shape overwrite handling.
#[derive(Debug, Clone)]
pub struct OverwriteOptions<'a> {
    pub mods_directory: &'a Path,
    /// Sidecar preserved across a replace.
    pub meta_file_name: &'a str,
    pub replace_retry_delay: Duration,
}

/// Keep asking for a name while the current one is empty.
///
/// Returns false when the user cancels the prompt.
pub fn ensure_valid_mod_name(
    name: &mut GuessedValue<String>,
    decisions: &mut dyn DecisionProvider,
) -> bool {
    while name.value().is_empty() {
        match decisions.get_mod_name(PromptReason::InvalidName, name.value()) {
            Some(entered) => {
                name.update(entered, GuessQuality::User);
            }
            None => return false,
        }
    }
    true
}

/// Make sure the directory for `mod_name` exists and is ready to receive
/// files, asking `decisions` whenever it already exists.
///
/// A requested backup is always written before anything is deleted.
pub fn resolve_target(
    mod_name: &mut GuessedValue<String>,
    options: &OverwriteOptions<'_>,
    decisions: &mut dyn DecisionProvider,
) -> Result<ResolvedTarget, InstallError> {
    let mut target = options.mods_directory.join(mod_name.value());

    while target.exists() {
        let decision = decisions.resolve_overwrite(&target);
        log::debug!(
            "{} exists, user chose {:?} (backup: {})",
            target.display(),
            decision.action,
            decision.backup
        );

        if decision.action == OverwriteAction::Abort {
            return Err(InstallError::OverwriteAborted);
        }

        if decision.backup || decision.action == OverwriteAction::Backup {
            let backup = generate_backup_name(&target);
            copy_dir_recursive(&target, &backup).map_err(|e| {
                InstallError::BackupFailed(format!("{}: {e}", backup.display()))
            })?;
            log::info!("Backed up {} to {}", target.display(), backup.display());
        }

        match decision.action {
            OverwriteAction::Abort | OverwriteAction::Backup => {}
            OverwriteAction::Rename => {
                let entered = match decision.new_name {
                    Some(name) => Some(name),
                    None => decisions.get_mod_name(PromptReason::Rename, mod_name.value()),
                };
                if let Some(name) = entered.filter(|n| !n.trim().is_empty()) {
                    mod_name.update(name, GuessQuality::User);
                    if !ensure_valid_mod_name(mod_name, decisions) {
                        return Err(InstallError::OverwriteAborted);
                    }
                    target = options.mods_directory.join(mod_name.value());
                }
            }
            OverwriteAction::Replace => {
                replace_directory(&target, options)?;
                return Ok(ResolvedTarget {
                    directory: target,
                    state: TargetState::Replaced,
                });
            }
            OverwriteAction::Merge => {
                return Ok(ResolvedTarget {
                    directory: target,
                    state: TargetState::Merged,
                });
            }
        }
    }

    fs::create_dir_all(&target)?;
    Ok(ResolvedTarget {
        directory: target,
        state: TargetState::Created,
    })
}

/// Empty `target` while keeping its metadata sidecar.
fn replace_directory(target: &Path, options: &OverwriteOptions<'_>) -> Result<(), InstallError> {
    let meta_path = target.join(options.meta_file_name);
    let saved_meta = match fs::read(&meta_path) {
        Ok(bytes) => Some(bytes),
        Err(e) if e.kind() == io::ErrorKind::NotFound => None,
        Err(e) => return Err(e.into()),
    };

    fs::remove_dir_all(target)?;
    if let Err(e) = fs::create_dir(target) {
        // The OS may hold on to a just-deleted directory for a moment.
        log::debug!("Recreating {} failed ({e}), retrying", target.display());
        thread::sleep(options.replace_retry_delay);
        fs::create_dir(target)?;
    }

    if let Some(bytes) = saved_meta {
        if let Err(e) = fs::write(&meta_path, bytes) {
            log::error!(
                "failed to restore original settings: {} ({e})",
                meta_path.display()
            );
        }
    }
    Ok(())
}
