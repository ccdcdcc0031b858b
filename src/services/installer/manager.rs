//! Runs one archive through the registered installer strategies.

use super::manual::ManualInstaller;
use super::plugin::{InstallContext, InstallOutcome, InstallerPlugin};
use super::quick::QuickInstaller;
use crate::services::archive::{ArchiveBackend, ArchiveSession, CodecArchive};
use crate::services::config::InstallerSettings;
use crate::services::decisions::DecisionProvider;
use crate::services::extraction::{extract_all, extract_one, extract_subset, ScratchFiles};
use crate::services::metadata::{gather_details, reconcile_metadata, CategoryMap, CategoryResolver};
use crate::services::overwrite::{ensure_valid_mod_name, resolve_target, OverwriteOptions};
use crate::services::tree::{build_tree, has_ini_tweaks, map_to_archive, DirectoryNode, TopLevelRules};
use crate::types::{ArchiveError, GuessedValue, InstallError, InstallerError, ModDetails};
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Extensions accepted before any custom strategy registers its own.
pub const BASE_EXTENSIONS: [&str; 4] = ["zip", "rar", "7z", "fomod"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InstallReport {
    pub outcome: InstallOutcome,
    /// The installed tree carries an INI tweaks folder with files in it.
    pub has_ini_tweaks: bool,
}

impl InstallReport {
    fn of(outcome: InstallOutcome) -> Self {
        Self {
            outcome,
            has_ini_tweaks: false,
        }
    }
}

pub struct InstallationManager {
    backend: Box<dyn ArchiveBackend>,
    installers: Vec<InstallerPlugin>,
    supported_extensions: BTreeSet<String>,
    settings: InstallerSettings,
    rules: TopLevelRules,
    categories: Box<dyn CategoryResolver>,
    scratch: ScratchFiles,
}

impl InstallationManager {
    pub fn new(settings: InstallerSettings) -> Self {
        let backend = CodecArchive::new(settings.password_attempts);
        Self::with_backend(settings, Box::new(backend))
    }

    pub fn with_backend(settings: InstallerSettings, backend: Box<dyn ArchiveBackend>) -> Self {
        Self {
            backend,
            installers: Vec::new(),
            supported_extensions: BASE_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            rules: TopLevelRules::from_settings(&settings),
            settings,
            categories: Box::new(CategoryMap::default()),
            scratch: ScratchFiles::new(),
        }
    }

    pub fn settings(&self) -> &InstallerSettings {
        &self.settings
    }

    pub fn set_mods_directory(&mut self, directory: PathBuf) {
        self.settings.mods_directory = directory;
    }

    pub fn set_category_resolver(&mut self, categories: Box<dyn CategoryResolver>) {
        self.categories = categories;
    }

    /// Add a strategy. Must happen before any install runs.
    pub fn register_installer(&mut self, plugin: InstallerPlugin) {
        for extension in plugin.supported_extensions() {
            self.supported_extensions
                .insert(extension.trim_start_matches('.').to_lowercase());
        }
        log::debug!(
            "Registered installer \"{}\" (priority {})",
            plugin.name(),
            plugin.priority()
        );
        self.installers.push(plugin);
    }

    /// Register the quick and manual strategies shipped with the crate.
    pub fn register_default_installers(&mut self) {
        let quick = QuickInstaller::new(self.rules.clone());
        self.register_installer(InstallerPlugin::Simple(Box::new(quick)));
        self.register_installer(InstallerPlugin::Simple(Box::new(ManualInstaller)));
    }

    /// Every archive extension an install can start from, sorted.
    pub fn supported_extensions(&self) -> Vec<String> {
        self.supported_extensions.iter().cloned().collect()
    }

    /// Scratch files written by strategies so far.
    pub fn scratch_files(&mut self) -> &mut ScratchFiles {
        &mut self.scratch
    }

    /// Install `archive` as a mod. `mod_name` carries the caller's guess in
    /// and the name actually used out.
    ///
    /// Cancellations come back as an `Ok` report. Any other error has been
    /// reported to `decisions` once before it is returned.
    pub fn install(
        &mut self,
        archive: &Path,
        mod_name: &mut GuessedValue<String>,
        decisions: &mut dyn DecisionProvider,
    ) -> Result<InstallReport, InstallError> {
        let mut details = ModDetails {
            name: mod_name.clone(),
            ..ModDetails::default()
        };
        let result = self.run(archive, &mut details, decisions);
        *mod_name = details.name;

        match result {
            Ok(report) => {
                log::info!(
                    "Install of {} finished: {:?}",
                    archive.display(),
                    report.outcome
                );
                Ok(report)
            }
            Err(e) if e.is_cancellation() => {
                log::info!("Install of {} cancelled: {e}", archive.display());
                Ok(InstallReport::of(InstallOutcome::Canceled))
            }
            Err(e) => {
                log::error!("Install of {} failed: {e}", archive.display());
                decisions.report_error(&e.to_string());
                Err(e)
            }
        }
    }

    /// Install another archive in full, reducing the result to success or
    /// failure.
    pub fn install_archive(
        &mut self,
        archive: &Path,
        mod_name: &mut GuessedValue<String>,
        decisions: &mut dyn DecisionProvider,
    ) -> InstallOutcome {
        match self.install(archive, mod_name, decisions) {
            Ok(report) if report.outcome == InstallOutcome::Success => InstallOutcome::Success,
            Ok(_) | Err(_) => InstallOutcome::Failed,
        }
    }

    fn run(
        &mut self,
        archive: &Path,
        details: &mut ModDetails,
        decisions: &mut dyn DecisionProvider,
    ) -> Result<InstallReport, InstallError> {
        let extension = archive
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        if !self.supported_extensions.contains(&extension) {
            let file_name = archive
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            let complete_suffix = file_name
                .split_once('.')
                .map(|(_, suffix)| suffix.to_string())
                .unwrap_or_default();
            return Err(InstallError::UnsupportedFormat(complete_suffix));
        }
        if !archive.is_file() {
            return Err(InstallError::BackendOpen(ArchiveError::NotFound(
                archive.display().to_string(),
            )));
        }

        gather_details(archive, details, self.categories.as_ref())?;
        let installation_file = archive
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let Self {
            backend,
            installers,
            settings,
            scratch,
            ..
        } = self;
        let settings: &InstallerSettings = settings;

        let (mut session, opened) =
            ArchiveSession::open(backend.as_mut(), archive, &mut || decisions.get_password());
        let open_error = opened.err();
        if let Some(e) = &open_error {
            log::error!("Failed to open {}: {e}", archive.display());
        }
        let tree = session.is_open().then(|| build_tree(session.entries()));

        let mut order: Vec<usize> = (0..installers.len()).collect();
        order.sort_by_key(|&idx| Reverse(installers[idx].priority()));

        let mut installed_tree: Option<DirectoryNode> = None;
        let mut manual_only = false;

        'passes: loop {
            for &idx in &order {
                let plugin = &mut installers[idx];
                if !plugin.is_active() || (manual_only && !plugin.is_manual_installer()) {
                    continue;
                }
                if !plugin.accepts(tree.as_ref(), archive) {
                    continue;
                }
                if matches!(plugin, InstallerPlugin::Custom(_))
                    && !plugin
                        .supported_extensions()
                        .iter()
                        .any(|ext| ext.trim_start_matches('.').eq_ignore_ascii_case(&extension))
                {
                    continue;
                }

                let name = plugin.name().to_string();
                log::debug!("Trying installer \"{name}\"");

                let attempt = match plugin {
                    InstallerPlugin::Simple(installer) => {
                        let Some(base) = tree.as_ref() else {
                            continue;
                        };
                        let mut working = base.clone();
                        match installer.install(details, &mut working, decisions) {
                            Ok(InstallOutcome::Success) => {
                                install_prepared_tree(
                                    &mut *session,
                                    &working,
                                    details,
                                    settings,
                                    &installation_file,
                                    decisions,
                                )?;
                                installed_tree = Some(working);
                                Ok(InstallOutcome::Success)
                            }
                            other => other,
                        }
                    }
                    InstallerPlugin::Custom(installer) => {
                        let mut context = ActiveInstall {
                            backend: &mut *session,
                            tree: tree.as_ref(),
                            settings,
                            scratch: &mut *scratch,
                            decisions: &mut *decisions,
                            archive,
                            installation_file: &installation_file,
                        };
                        installer.install(details, archive, &mut context)
                    }
                };

                match attempt {
                    Err(InstallerError::Incompatible(reason)) => {
                        let skipped = InstallError::StrategyIncompatible { name, reason };
                        log::error!("{skipped}");
                    }
                    Err(InstallerError::Cancelled) => {
                        return Ok(InstallReport::of(InstallOutcome::Canceled));
                    }
                    Err(InstallerError::Failed(reason)) => {
                        return Err(InstallError::Installer { name, reason });
                    }
                    Ok(InstallOutcome::NotAttempted) => {}
                    Ok(InstallOutcome::ManualRequested) => {
                        if !manual_only {
                            log::debug!("\"{name}\" requested manual installation");
                            manual_only = true;
                            continue 'passes;
                        }
                    }
                    Ok(outcome @ (InstallOutcome::Failed | InstallOutcome::Canceled)) => {
                        return Ok(InstallReport::of(outcome));
                    }
                    Ok(InstallOutcome::Success) => {
                        let final_tree = installed_tree.as_ref().or(tree.as_ref());
                        let has_ini_tweaks = final_tree
                            .is_some_and(|t| has_ini_tweaks(t, &settings.ini_tweaks_directory));
                        return Ok(InstallReport {
                            outcome: InstallOutcome::Success,
                            has_ini_tweaks,
                        });
                    }
                }
            }
            break;
        }

        Err(match open_error {
            Some(e) => InstallError::BackendOpen(e),
            None => InstallError::NoCompatibleInstaller,
        })
    }
}

/// Flag the archive entries `tree` selects, then run the shared tail of every
/// install: pick the target directory, extract, record metadata.
fn install_prepared_tree(
    backend: &mut dyn ArchiveBackend,
    tree: &DirectoryNode,
    details: &mut ModDetails,
    settings: &InstallerSettings,
    installation_file: &str,
    decisions: &mut dyn DecisionProvider,
) -> Result<PathBuf, InstallError> {
    map_to_archive(tree, backend.entries_mut());

    if !ensure_valid_mod_name(&mut details.name, decisions) {
        return Err(InstallError::Cancelled);
    }

    let options = OverwriteOptions {
        mods_directory: &settings.mods_directory,
        meta_file_name: &settings.meta_file_name,
        replace_retry_delay: Duration::from_millis(settings.replace_retry_delay_ms),
    };
    let target = resolve_target(&mut details.name, &options, decisions)?;
    log::debug!("installing to \"{}\"", target.directory.display());

    extract_all(backend, &target.directory, decisions)?;

    if let Err(e) = reconcile_metadata(
        &target.directory,
        &settings.meta_file_name,
        details,
        installation_file,
    ) {
        // Files are in place already; stale metadata is left for the user.
        log::error!("Failed to write metadata for {}: {e}", target.directory.display());
    }
    Ok(target.directory)
}

/// What a custom strategy sees of the running install.
struct ActiveInstall<'s> {
    backend: &'s mut dyn ArchiveBackend,
    tree: Option<&'s DirectoryNode>,
    settings: &'s InstallerSettings,
    scratch: &'s mut ScratchFiles,
    decisions: &'s mut dyn DecisionProvider,
    archive: &'s Path,
    installation_file: &'s str,
}

impl ActiveInstall<'_> {
    fn require_open(&self) -> Result<(), InstallError> {
        if self.backend.is_open() {
            Ok(())
        } else {
            Err(InstallError::BackendOpen(ArchiveError::NotOpen))
        }
    }
}

impl InstallContext for ActiveInstall<'_> {
    fn mods_directory(&self) -> &Path {
        &self.settings.mods_directory
    }

    fn current_archive(&self) -> &Path {
        self.archive
    }

    fn archive_tree(&self) -> Option<&DirectoryNode> {
        self.tree
    }

    fn decisions(&mut self) -> &mut dyn DecisionProvider {
        &mut *self.decisions
    }

    fn extract_file(&mut self, file_name: &str) -> Result<Option<PathBuf>, InstallError> {
        self.require_open()?;
        extract_one(
            &mut *self.backend,
            file_name,
            &self.settings.scratch_directory,
            &mut *self.scratch,
            &mut *self.decisions,
        )
    }

    fn extract_files(&mut self, file_names: &[String]) -> Result<Vec<PathBuf>, InstallError> {
        self.require_open()?;
        extract_subset(
            &mut *self.backend,
            file_names,
            &self.settings.scratch_directory,
            &mut *self.scratch,
            &mut *self.decisions,
        )
    }

    fn install_tree(
        &mut self,
        details: &mut ModDetails,
        tree: DirectoryNode,
    ) -> Result<InstallOutcome, InstallError> {
        self.require_open()?;
        install_prepared_tree(
            &mut *self.backend,
            &tree,
            details,
            self.settings,
            self.installation_file,
            &mut *self.decisions,
        )?;
        Ok(InstallOutcome::Success)
    }
}
