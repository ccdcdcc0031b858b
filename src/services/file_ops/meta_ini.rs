//! Key/value INI files used for per-mod metadata (`meta.ini`) and the
//! `.meta` companion written next to downloaded archives.
//!
//! Only the `[General]` section is interpreted. Every other line is kept as
//! read so saving never loses data written by other tools.

use crate::services::fs_utils::file_utils::atomic_write;
use regex::Regex;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

const GENERAL_SECTION: &str = "General";

static SECTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\[([^\]]+)\]\s*$").expect("valid section regex"));
static KEY_VALUE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([^=;#\[\s][^=]*?)\s*=\s*(.*?)\s*$").expect("valid key/value regex")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaIni {
    path: PathBuf,
    lines: Vec<String>,
}

impl MetaIni {
    /// Read `path`. A missing file gives an empty document that will be
    /// created on `save`.
    pub fn load(path: &Path) -> io::Result<Self> {
        let content = match fs::read(path) {
            Ok(bytes) => {
                let bytes = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(&bytes);
                String::from_utf8_lossy(bytes).into_owned()
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(e),
        };
        Ok(Self {
            path: path.to_path_buf(),
            lines: content.lines().map(str::to_string).collect(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Line index of `key` inside the general section. Lines before the
    /// first header count as general too.
    fn find(&self, key: &str) -> Option<usize> {
        let mut in_general = true;
        for (idx, line) in self.lines.iter().enumerate() {
            if let Some(caps) = SECTION_RE.captures(line) {
                in_general = caps[1].trim().eq_ignore_ascii_case(GENERAL_SECTION);
                continue;
            }
            if !in_general {
                continue;
            }
            if let Some(caps) = KEY_VALUE_RE.captures(line) {
                if &caps[1] == key {
                    return Some(idx);
                }
            }
        }
        None
    }

    pub fn contains(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        let idx = self.find(key)?;
        let caps = KEY_VALUE_RE.captures(&self.lines[idx])?;
        let value = caps.get(2)?.as_str();
        Some(
            value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .unwrap_or(value),
        )
    }

    pub fn get_int(&self, key: &str) -> Option<i64> {
        self.get(key)?.trim().parse().ok()
    }

    pub fn set(&mut self, key: &str, value: impl std::fmt::Display) {
        let line = format!("{key}={value}");
        if let Some(idx) = self.find(key) {
            self.lines[idx] = line;
            return;
        }

        let header = self.lines.iter().position(|l| {
            SECTION_RE
                .captures(l)
                .is_some_and(|caps| caps[1].trim().eq_ignore_ascii_case(GENERAL_SECTION))
        });
        match header {
            Some(header_idx) => {
                // Append after the last line of the general section.
                let end = self.lines[header_idx + 1..]
                    .iter()
                    .position(|l| SECTION_RE.is_match(l))
                    .map(|offset| header_idx + 1 + offset)
                    .unwrap_or(self.lines.len());
                self.lines.insert(end, line);
            }
            None => {
                self.lines.insert(0, format!("[{GENERAL_SECTION}]"));
                self.lines.insert(1, line);
            }
        }
    }

    pub fn save(&self) -> io::Result<()> {
        let mut content = self.lines.join("\n");
        content.push('\n');
        atomic_write(&self.path, content.as_bytes())
    }
}
