//! Archive backend over the `zip`, `sevenz-rust` and `rar` decoders.

use super::backend::{ArchiveBackend, PasswordPrompt};
use super::types::{ArchiveEntry, ArchiveFormat, CancelHandle, ExtractObserver, ARCHIVE_SEPARATOR};
use crate::services::fs_utils::path_utils::resolve_safe_path;
use crate::types::errors::ArchiveError;
use sevenz_rust::{Password, SevenZReader};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use walkdir::WalkDir;
use zip::result::ZipError;

pub const DEFAULT_PASSWORD_ATTEMPTS: usize = 3;

enum OpenSource {
    Zip {
        path: PathBuf,
        password: Option<String>,
        encrypted: Vec<bool>,
    },
    SevenZ {
        path: PathBuf,
        password: Option<String>,
    },
    /// RAR archives are unpacked to a private staging directory on open.
    Rar { staging: TempDir },
}

/// One entry picked for extraction, resolved against the destination.
struct Selected {
    index: usize,
    archive_path: String,
    output_path: String,
    target: PathBuf,
}

pub struct CodecArchive {
    source: Option<OpenSource>,
    entries: Vec<ArchiveEntry>,
    cancel: CancelHandle,
    last_error: Option<ArchiveError>,
    password_attempts: usize,
}

impl Default for CodecArchive {
    fn default() -> Self {
        Self::new(DEFAULT_PASSWORD_ATTEMPTS)
    }
}

impl CodecArchive {
    pub fn new(password_attempts: usize) -> Self {
        Self {
            source: None,
            entries: Vec::new(),
            cancel: CancelHandle::new(),
            last_error: None,
            password_attempts: password_attempts.max(1),
        }
    }

    fn remember(&mut self, error: ArchiveError) -> ArchiveError {
        self.last_error = Some(duplicate_error(&error));
        error
    }

    fn open_zip(
        &self,
        path: &Path,
        prompt: &mut PasswordPrompt<'_>,
    ) -> Result<(OpenSource, Vec<ArchiveEntry>), ArchiveError> {
        let file = fs::File::open(path)?;
        let mut archive =
            zip::ZipArchive::new(file).map_err(|e| ArchiveError::Invalid(e.to_string()))?;

        let mut entries = Vec::with_capacity(archive.len());
        let mut encrypted = Vec::with_capacity(archive.len());
        let mut probe = None;
        for i in 0..archive.len() {
            let raw = archive
                .by_index_raw(i)
                .map_err(|e| ArchiveError::Invalid(format!("entry {i}: {e}")))?;
            let is_dir = raw.is_dir();
            if raw.encrypted() && !is_dir && probe.is_none() {
                probe = Some(i);
            }
            encrypted.push(raw.encrypted());
            entries.push(ArchiveEntry::new(i, normalize_entry_path(raw.name()), is_dir));
        }

        let password = match probe {
            Some(index) => Some(self.request_zip_password(&mut archive, index, prompt)?),
            None => None,
        };

        Ok((
            OpenSource::Zip {
                path: path.to_path_buf(),
                password,
                encrypted,
            },
            entries,
        ))
    }

    fn request_zip_password(
        &self,
        archive: &mut zip::ZipArchive<fs::File>,
        index: usize,
        prompt: &mut PasswordPrompt<'_>,
    ) -> Result<String, ArchiveError> {
        for attempt in 1..=self.password_attempts {
            let Some(password) = prompt() else {
                return Err(ArchiveError::PasswordRequired);
            };
            match archive.by_index_decrypt(index, password.as_bytes()) {
                Ok(_) => return Ok(password),
                Err(ZipError::InvalidPassword) => {
                    log::warn!("Wrong archive password (attempt {attempt})");
                }
                Err(e) => return Err(ArchiveError::Open(e.to_string())),
            }
        }
        Err(ArchiveError::PasswordRequired)
    }

    fn open_7z(
        &self,
        path: &Path,
        prompt: &mut PasswordPrompt<'_>,
    ) -> Result<(OpenSource, Vec<ArchiveEntry>), ArchiveError> {
        let mut password: Option<String> = None;
        let mut attempts = 0;
        let reader = loop {
            let key = match &password {
                Some(p) => Password::from(p.as_str()),
                None => Password::empty(),
            };
            match SevenZReader::open(path, key) {
                Ok(reader) => break reader,
                Err(sevenz_rust::Error::PasswordRequired)
                | Err(sevenz_rust::Error::MaybeBadPassword(_)) => {
                    if attempts >= self.password_attempts {
                        return Err(ArchiveError::PasswordRequired);
                    }
                    attempts += 1;
                    match prompt() {
                        Some(p) => password = Some(p),
                        None => return Err(ArchiveError::PasswordRequired),
                    }
                }
                Err(e) => return Err(ArchiveError::Open(e.to_string())),
            }
        };

        let entries = reader
            .archive()
            .files
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                ArchiveEntry::new(i, normalize_entry_path(entry.name()), entry.is_directory())
            })
            .collect();

        Ok((
            OpenSource::SevenZ {
                path: path.to_path_buf(),
                password,
            },
            entries,
        ))
    }

    fn open_rar(
        &self,
        path: &Path,
        prompt: &mut PasswordPrompt<'_>,
    ) -> Result<(OpenSource, Vec<ArchiveEntry>), ArchiveError> {
        let path_str = path
            .to_str()
            .ok_or_else(|| ArchiveError::Open("RAR path contains invalid UTF-8".into()))?;

        let mut password = String::new();
        let mut attempts = 0;
        let staging = loop {
            let staging = tempfile::tempdir()?;
            let staging_str = staging
                .path()
                .to_str()
                .ok_or_else(|| ArchiveError::Open("Temp path contains invalid UTF-8".into()))?
                .to_string();
            match rar::Archive::extract_all(path_str, &staging_str, &password) {
                Ok(_) => break staging,
                Err(e) => {
                    let msg = format!("{e:?}");
                    if !msg.to_lowercase().contains("password") {
                        return Err(ArchiveError::Open(msg));
                    }
                    if attempts >= self.password_attempts {
                        return Err(ArchiveError::PasswordRequired);
                    }
                    attempts += 1;
                    match prompt() {
                        Some(p) => password = p,
                        None => return Err(ArchiveError::PasswordRequired),
                    }
                }
            }
        };

        let mut entries = Vec::new();
        for entry in WalkDir::new(staging.path())
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let relative = entry
                .path()
                .strip_prefix(staging.path())
                .map_err(|e| ArchiveError::Library(e.to_string()))?;
            let name = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/");
            entries.push(ArchiveEntry::new(
                entries.len(),
                name,
                entry.file_type().is_dir(),
            ));
        }

        Ok((OpenSource::Rar { staging }, entries))
    }

    /// Snapshot the entries picked for extraction.
    fn select(&self, destination: &Path) -> Result<(Vec<Selected>, Vec<Selected>), ArchiveError> {
        let mut dirs = Vec::new();
        let mut files = Vec::new();
        for entry in self.entries.iter().filter(|e| !e.skip) {
            if entry.output_path.is_empty() {
                continue;
            }
            let target = resolve_safe_path(destination, &entry.output_path).map_err(|_| {
                ArchiveError::Extract(format!("unsafe output path: {}", entry.output_path))
            })?;
            let selected = Selected {
                index: entry.index,
                archive_path: entry.path.clone(),
                output_path: entry.output_path.clone(),
                target,
            };
            if entry.is_directory {
                dirs.push(selected);
            } else {
                files.push(selected);
            }
        }
        Ok((dirs, files))
    }

    fn run_extract(
        &self,
        destination: &Path,
        observer: &mut dyn ExtractObserver,
    ) -> Result<(), ArchiveError> {
        let source = self.source.as_ref().ok_or(ArchiveError::NotOpen)?;
        let (dirs, files) = self.select(destination)?;
        let mut progress = Progress::new(dirs.len() + files.len());

        fs::create_dir_all(destination)?;
        observer.on_progress(0.0);

        for dir in &dirs {
            if self.cancel.is_cancelled() {
                return Err(ArchiveError::Cancelled);
            }
            fs::create_dir_all(&dir.target)?;
            progress.step(observer, &dir.output_path);
        }

        match source {
            OpenSource::Zip {
                path,
                password,
                encrypted,
            } => self.extract_zip(
                path,
                password.as_deref(),
                encrypted,
                &files,
                &mut progress,
                observer,
            ),
            OpenSource::SevenZ { path, password } => {
                self.extract_7z(path, password.as_deref(), &files, &mut progress, observer)
            }
            OpenSource::Rar { staging } => {
                self.extract_rar(staging.path(), &files, &mut progress, observer)
            }
        }
    }

    fn extract_zip(
        &self,
        path: &Path,
        password: Option<&str>,
        encrypted: &[bool],
        files: &[Selected],
        progress: &mut Progress,
        observer: &mut dyn ExtractObserver,
    ) -> Result<(), ArchiveError> {
        let file = fs::File::open(path)?;
        let mut archive =
            zip::ZipArchive::new(file).map_err(|e| ArchiveError::Invalid(e.to_string()))?;

        for item in files {
            if self.cancel.is_cancelled() {
                return Err(ArchiveError::Cancelled);
            }
            let needs_password = encrypted.get(item.index).copied().unwrap_or(false);
            let mut entry = match (password, needs_password) {
                (Some(pw), true) => archive.by_index_decrypt(item.index, pw.as_bytes()),
                _ => archive.by_index(item.index),
            }
            .map_err(|e| ArchiveError::Extract(format!("{}: {e}", item.archive_path)))?;

            write_entry(&mut entry, &item.target)?;
            progress.step(observer, &item.output_path);
        }
        Ok(())
    }

    fn extract_7z(
        &self,
        path: &Path,
        password: Option<&str>,
        files: &[Selected],
        progress: &mut Progress,
        observer: &mut dyn ExtractObserver,
    ) -> Result<(), ArchiveError> {
        if files.is_empty() {
            return Ok(());
        }
        let key = password.map(Password::from).unwrap_or_else(Password::empty);
        let mut reader =
            SevenZReader::open(path, key).map_err(|e| ArchiveError::Open(e.to_string()))?;

        let wanted: HashMap<&str, &Selected> = files
            .iter()
            .map(|item| (item.archive_path.as_str(), item))
            .collect();
        let mut cancelled = false;

        reader
            .for_each_entries(|entry, data| {
                if self.cancel.is_cancelled() {
                    cancelled = true;
                    return Ok(false);
                }
                let name = normalize_entry_path(entry.name());
                let Some(item) = wanted.get(name.as_str()) else {
                    io::copy(data, &mut io::sink())?;
                    return Ok(true);
                };
                write_entry(data, &item.target)
                    .map_err(|e| sevenz_rust::Error::other(e.to_string()))?;
                progress.step(observer, &item.output_path);
                Ok(true)
            })
            .map_err(|e| match e {
                sevenz_rust::Error::PasswordRequired | sevenz_rust::Error::MaybeBadPassword(_) => {
                    ArchiveError::PasswordRequired
                }
                other => ArchiveError::Extract(other.to_string()),
            })?;

        if cancelled {
            return Err(ArchiveError::Cancelled);
        }
        Ok(())
    }

    fn extract_rar(
        &self,
        staging: &Path,
        files: &[Selected],
        progress: &mut Progress,
        observer: &mut dyn ExtractObserver,
    ) -> Result<(), ArchiveError> {
        for item in files {
            if self.cancel.is_cancelled() {
                return Err(ArchiveError::Cancelled);
            }
            let source = staging.join(&item.archive_path);
            let mut input = fs::File::open(&source)
                .map_err(|e| ArchiveError::Extract(format!("{}: {e}", item.archive_path)))?;
            write_entry(&mut input, &item.target)?;
            progress.step(observer, &item.output_path);
        }
        Ok(())
    }
}

impl ArchiveBackend for CodecArchive {
    fn open(&mut self, path: &Path, password: &mut PasswordPrompt<'_>) -> Result<(), ArchiveError> {
        self.close();
        self.cancel.reset();
        self.last_error = None;

        if !path.exists() {
            let err = ArchiveError::NotFound(path.display().to_string());
            return Err(self.remember(err));
        }

        let Some(format) = ArchiveFormat::detect(path) else {
            let ext = path
                .extension()
                .map(|e| e.to_string_lossy().to_string())
                .unwrap_or_default();
            return Err(self.remember(ArchiveError::UnsupportedFormat(ext)));
        };

        let opened = match format {
            ArchiveFormat::Zip => self.open_zip(path, password),
            ArchiveFormat::SevenZ => self.open_7z(path, password),
            ArchiveFormat::Rar => self.open_rar(path, password),
        };

        match opened {
            Ok((source, entries)) => {
                log::debug!(
                    "Opened {:?} archive {} ({} entries)",
                    format,
                    path.display(),
                    entries.len()
                );
                self.source = Some(source);
                self.entries = entries;
                Ok(())
            }
            Err(e) => Err(self.remember(e)),
        }
    }

    fn is_open(&self) -> bool {
        self.source.is_some()
    }

    fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    fn entries_mut(&mut self) -> &mut [ArchiveEntry] {
        &mut self.entries
    }

    fn extract(
        &mut self,
        destination: &Path,
        observer: &mut dyn ExtractObserver,
    ) -> Result<(), ArchiveError> {
        self.cancel.reset();
        self.last_error = None;
        match self.run_extract(destination, observer) {
            Ok(()) => {
                observer.on_progress(1.0);
                Ok(())
            }
            Err(e) => {
                if !e.is_cancelled() {
                    observer.on_error(&e.to_string());
                }
                Err(self.remember(e))
            }
        }
    }

    fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    fn last_error(&self) -> Option<&ArchiveError> {
        self.last_error.as_ref()
    }

    fn close(&mut self) {
        self.source = None;
        self.entries.clear();
    }
}

struct Progress {
    done: usize,
    total: usize,
}

impl Progress {
    fn new(total: usize) -> Self {
        Self {
            done: 0,
            total: total.max(1),
        }
    }

    fn step(&mut self, observer: &mut dyn ExtractObserver, output_path: &str) {
        self.done += 1;
        observer.on_file(output_path);
        observer.on_progress((self.done as f32 / self.total as f32).min(1.0));
    }
}

fn write_entry(reader: &mut dyn io::Read, target: &Path) -> Result<(), ArchiveError> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut outfile = fs::File::create(target)?;
    io::copy(reader, &mut outfile)
        .map_err(|e| ArchiveError::Extract(format!("{}: {e}", target.display())))?;
    Ok(())
}

/// Backslashes become `/`, leading and trailing separators are dropped.
pub fn normalize_entry_path(name: &str) -> String {
    name.replace('\\', "/")
        .trim_matches(ARCHIVE_SEPARATOR)
        .to_string()
}

fn duplicate_error(error: &ArchiveError) -> ArchiveError {
    match error {
        ArchiveError::NotOpen => ArchiveError::NotOpen,
        ArchiveError::NotFound(s) => ArchiveError::NotFound(s.clone()),
        ArchiveError::PasswordRequired => ArchiveError::PasswordRequired,
        ArchiveError::UnsupportedFormat(s) => ArchiveError::UnsupportedFormat(s.clone()),
        ArchiveError::Open(s) => ArchiveError::Open(s.clone()),
        ArchiveError::Invalid(s) => ArchiveError::Invalid(s.clone()),
        ArchiveError::Library(s) => ArchiveError::Library(s.clone()),
        ArchiveError::Extract(s) => ArchiveError::Extract(s.clone()),
        ArchiveError::Cancelled => ArchiveError::Cancelled,
        ArchiveError::Io(e) => ArchiveError::Io(io::Error::new(e.kind(), e.to_string())),
    }
}
