use crate::services::archive::{
    ArchiveBackend, ArchiveEntry, CancelHandle, ExtractObserver, PasswordPrompt,
};
use crate::services::decisions::{
    DecisionProvider, OverwriteAction, OverwriteDecision, PromptReason,
};
use crate::services::fs_utils::path_utils::resolve_safe_path;
use crate::services::tree::DirectoryNode;
use crate::types::ArchiveError;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Once;

static INIT: Once = Once::new();

pub fn init_logger() {
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// Build a stored zip at `dir/name`. Names ending in `/` become directories.
pub fn create_test_zip(dir: &Path, name: &str, files: &[(&str, &[u8])]) -> PathBuf {
    let zip_path = dir.join(name);
    let file = fs::File::create(&zip_path).unwrap();
    let mut writer = zip::ZipWriter::new(file);
    let options =
        zip::write::SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);

    for (entry_name, content) in files {
        if entry_name.ends_with('/') {
            writer.add_directory(entry_name.to_string(), options).unwrap();
        } else {
            writer.start_file(entry_name.to_string(), options).unwrap();
            writer.write_all(content).unwrap();
        }
    }
    writer.finish().unwrap();
    zip_path
}

/// Observer that keeps every event, optionally cancelling on the first
/// progress report.
#[derive(Default)]
pub struct RecordingObserver {
    pub files: Vec<String>,
    pub progress: Vec<f32>,
    pub errors: Vec<String>,
    pub cancel_on_progress: Option<CancelHandle>,
}

impl ExtractObserver for RecordingObserver {
    fn on_progress(&mut self, fraction: f32) {
        self.progress.push(fraction);
        if let Some(handle) = &self.cancel_on_progress {
            handle.cancel();
        }
    }

    fn on_file(&mut self, output_path: &str) {
        self.files.push(output_path.to_string());
    }

    fn on_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }
}

/// Decision provider answering from queues and recording what it was asked.
#[derive(Default)]
pub struct ScriptedDecisions {
    pub passwords: VecDeque<String>,
    pub overwrites: VecDeque<OverwriteDecision>,
    pub names: VecDeque<Option<String>>,
    pub accept_manual: bool,
    pub cancel_extraction: bool,
    pub asked: Vec<String>,
    pub errors: Vec<String>,
    pub extraction_errors: Vec<String>,
    pub files: Vec<String>,
}

impl ScriptedDecisions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn overwrite(mut self, decision: OverwriteDecision) -> Self {
        self.overwrites.push_back(decision);
        self
    }

    pub fn name(mut self, name: Option<&str>) -> Self {
        self.names.push_back(name.map(str::to_string));
        self
    }

    pub fn password(mut self, password: &str) -> Self {
        self.passwords.push_back(password.to_string());
        self
    }

    pub fn count(&self, question: &str) -> usize {
        self.asked.iter().filter(|q| q.as_str() == question).count()
    }
}

impl DecisionProvider for ScriptedDecisions {
    fn get_password(&mut self) -> Option<String> {
        self.asked.push("password".into());
        self.passwords.pop_front()
    }

    fn resolve_overwrite(&mut self, _target: &Path) -> OverwriteDecision {
        self.asked.push("overwrite".into());
        self.overwrites
            .pop_front()
            .unwrap_or_else(|| OverwriteDecision::new(OverwriteAction::Abort))
    }

    fn get_mod_name(&mut self, _reason: PromptReason, _current: &str) -> Option<String> {
        self.asked.push("name".into());
        self.names.pop_front().flatten()
    }

    fn confirm_manual_install(&mut self, _tree: &DirectoryNode) -> bool {
        self.asked.push("manual".into());
        self.accept_manual
    }

    fn report_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }

    fn update_progress(&mut self, _fraction: f32) -> bool {
        !self.cancel_extraction
    }

    fn progress_file(&mut self, name: &str) {
        self.files.push(name.to_string());
    }

    fn extraction_error(&mut self, message: &str) {
        self.extraction_errors.push(message.to_string());
    }
}

/// What a [`FakeArchive`] was asked to do.
#[derive(Debug, Default)]
pub struct FakeArchiveLog {
    pub opened: usize,
    pub closed: usize,
    pub password_prompts: usize,
    /// Output paths written by each `extract` call.
    pub extracted: Vec<Vec<String>>,
}

/// In-memory archive backend.
pub struct FakeArchive {
    files: Vec<(String, bool, Vec<u8>)>,
    password: Option<String>,
    fail_open: bool,
    entries: Vec<ArchiveEntry>,
    open: bool,
    cancel: CancelHandle,
    last_error: Option<ArchiveError>,
    log: Rc<RefCell<FakeArchiveLog>>,
}

impl FakeArchive {
    /// `paths` ending in `/` are directories.
    pub fn new(paths: &[&str]) -> Self {
        Self {
            files: paths
                .iter()
                .map(|p| {
                    let is_dir = p.ends_with('/');
                    let path = p.trim_end_matches('/').to_string();
                    let content = format!("content of {path}").into_bytes();
                    (path, is_dir, content)
                })
                .collect(),
            password: None,
            fail_open: false,
            entries: Vec::new(),
            open: false,
            cancel: CancelHandle::new(),
            last_error: None,
            log: Rc::new(RefCell::new(FakeArchiveLog::default())),
        }
    }

    pub fn with_password(mut self, password: &str) -> Self {
        self.password = Some(password.to_string());
        self
    }

    pub fn failing_open(mut self) -> Self {
        self.fail_open = true;
        self
    }

    pub fn log(&self) -> Rc<RefCell<FakeArchiveLog>> {
        Rc::clone(&self.log)
    }
}

impl FakeArchive {
    fn write_entries(
        &self,
        selected: &[ArchiveEntry],
        destination: &Path,
        observer: &mut dyn ExtractObserver,
        written: &mut Vec<String>,
    ) -> Result<(), ArchiveError> {
        observer.on_progress(0.0);
        for (done, entry) in selected.iter().enumerate() {
            if self.cancel.is_cancelled() {
                return Err(ArchiveError::Cancelled);
            }
            let target = resolve_safe_path(destination, &entry.output_path)?;
            if entry.is_directory {
                fs::create_dir_all(&target)?;
            } else {
                if let Some(parent) = target.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(&target, &self.files[entry.index].2)?;
            }
            written.push(entry.output_path.clone());
            observer.on_file(&entry.output_path);
            observer.on_progress((done + 1) as f32 / selected.len() as f32);
        }
        Ok(())
    }
}

impl ArchiveBackend for FakeArchive {
    fn open(&mut self, _path: &Path, password: &mut PasswordPrompt<'_>) -> Result<(), ArchiveError> {
        self.close();
        if self.fail_open {
            self.last_error = Some(ArchiveError::Invalid("broken".into()));
            return Err(ArchiveError::Invalid("broken".into()));
        }
        if let Some(expected) = self.password.clone() {
            let mut accepted = false;
            for _ in 0..3 {
                self.log.borrow_mut().password_prompts += 1;
                match password() {
                    Some(given) if given == expected => {
                        accepted = true;
                        break;
                    }
                    Some(_) => continue,
                    None => break,
                }
            }
            if !accepted {
                return Err(ArchiveError::PasswordRequired);
            }
        }

        self.entries = self
            .files
            .iter()
            .enumerate()
            .map(|(index, (path, is_dir, _))| ArchiveEntry::new(index, path.clone(), *is_dir))
            .collect();
        self.open = true;
        self.log.borrow_mut().opened += 1;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open
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
        let selected: Vec<ArchiveEntry> =
            self.entries.iter().filter(|e| !e.skip).cloned().collect();
        let mut written = Vec::new();
        let result = self.write_entries(&selected, destination, observer, &mut written);
        self.log.borrow_mut().extracted.push(written);

        match result {
            Ok(()) => Ok(()),
            Err(ArchiveError::Cancelled) => {
                self.last_error = Some(ArchiveError::Cancelled);
                Err(ArchiveError::Cancelled)
            }
            Err(e) => {
                observer.on_error(&e.to_string());
                Err(e)
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
        if self.open {
            self.log.borrow_mut().closed += 1;
        }
        self.open = false;
        self.entries.clear();
    }
}
