#![allow(dead_code)]

use mod_installer_lib::services::config::InstallerSettings;
use mod_installer_lib::services::decisions::{
    DecisionProvider, OverwriteAction, OverwriteDecision, PromptReason,
};
use mod_installer_lib::services::tree::DirectoryNode;
use std::collections::VecDeque;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Once;
use tempfile::TempDir;

static INIT: Once = Once::new();

pub fn init_logger() {
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

pub struct TestContext {
    pub dir: TempDir,
    pub settings: InstallerSettings,
}

impl TestContext {
    pub fn new() -> Self {
        init_logger();
        let dir = TempDir::new().expect("temp dir should be created");
        let settings = InstallerSettings {
            mods_directory: dir.path().join("mods"),
            scratch_directory: dir.path().join("scratch"),
            replace_retry_delay_ms: 1,
            ..InstallerSettings::default()
        };
        fs::create_dir_all(&settings.scratch_directory).expect("scratch dir should be created");
        Self { dir, settings }
    }

    pub fn mod_dir(&self, name: &str) -> PathBuf {
        self.settings.mods_directory.join(name)
    }

    /// Stored zip under the context's temp dir. Names ending in `/` become
    /// directory entries.
    pub fn zip(&self, name: &str, files: &[(&str, &str)]) -> PathBuf {
        let path = self.dir.path().join(name);
        write_zip(&path, files);
        path
    }
}

pub fn write_zip(path: &Path, files: &[(&str, &str)]) {
    let file = fs::File::create(path).expect("zip file should be created");
    let mut writer = zip::ZipWriter::new(file);
    let options =
        zip::write::SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
    for (name, content) in files {
        if name.ends_with('/') {
            writer.add_directory(name.to_string(), options).unwrap();
        } else {
            writer.start_file(name.to_string(), options).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
    }
    writer.finish().expect("zip should be finished");
}

/// Answers from queues; anything not scripted aborts or declines.
#[derive(Default)]
pub struct ScriptedDecisions {
    pub overwrites: VecDeque<OverwriteDecision>,
    pub names: VecDeque<String>,
    pub accept_manual: bool,
    pub errors: Vec<String>,
    pub overwrite_prompts: usize,
}

impl ScriptedDecisions {
    pub fn answering(action: OverwriteAction) -> Self {
        Self {
            overwrites: VecDeque::from([OverwriteDecision::new(action)]),
            ..Self::default()
        }
    }
}

impl DecisionProvider for ScriptedDecisions {
    fn get_password(&mut self) -> Option<String> {
        None
    }

    fn resolve_overwrite(&mut self, _target: &Path) -> OverwriteDecision {
        self.overwrite_prompts += 1;
        self.overwrites
            .pop_front()
            .unwrap_or_else(|| OverwriteDecision::new(OverwriteAction::Abort))
    }

    fn get_mod_name(&mut self, _reason: PromptReason, _current: &str) -> Option<String> {
        self.names.pop_front()
    }

    fn confirm_manual_install(&mut self, _tree: &DirectoryNode) -> bool {
        self.accept_manual
    }

    fn report_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }
}
