use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Read;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Separator used in every archive entry path handed out by a backend.
pub const ARCHIVE_SEPARATOR: char = '/';

/// Supported archive container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArchiveFormat {
    Zip,
    SevenZ,
    Rar,
}

impl ArchiveFormat {
    /// Detect format from file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "zip" => Some(Self::Zip),
            "7z" => Some(Self::SevenZ),
            "rar" => Some(Self::Rar),
            _ => None,
        }
    }

    /// Detect format from the leading magic bytes.
    pub fn from_magic(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(b"PK\x03\x04") || bytes.starts_with(b"PK\x05\x06") {
            Some(Self::Zip)
        } else if bytes.starts_with(&[0x37, 0x7A, 0xBC, 0xAF, 0x27, 0x1C]) {
            Some(Self::SevenZ)
        } else if bytes.starts_with(b"Rar!") {
            Some(Self::Rar)
        } else {
            None
        }
    }

    /// Sniff the file header, falling back to the extension.
    /// `.fomod` packages are zip or 7z containers and only sniffing finds out which.
    pub fn detect(path: &Path) -> Option<Self> {
        let mut header = [0u8; 8];
        let sniffed = fs::File::open(path)
            .and_then(|mut file| file.read(&mut header))
            .ok()
            .and_then(|read| Self::from_magic(&header[..read]));
        sniffed.or_else(|| Self::from_path(path))
    }
}

/// One file or directory inside the open archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Full path relative to the archive root, `/`-separated.
    pub path: String,
    pub is_directory: bool,
    /// Excluded from extraction unless cleared.
    pub skip: bool,
    /// Destination relative to the extraction root.
    pub output_path: String,
    /// Position in the backend's entry list.
    pub index: usize,
}

impl ArchiveEntry {
    pub fn new(index: usize, path: impl Into<String>, is_directory: bool) -> Self {
        let path = path.into();
        Self {
            output_path: path.clone(),
            path,
            is_directory,
            skip: true,
            index,
        }
    }

    /// Last path segment.
    pub fn file_name(&self) -> &str {
        self.path
            .rsplit(ARCHIVE_SEPARATOR)
            .next()
            .unwrap_or(self.path.as_str())
    }
}

/// Shared flag used to ask a running extraction to stop.
///
/// Cloned out of the backend before `extract` starts so progress handlers can
/// request a stop without touching the backend itself.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Receives extraction events, in order, on the calling thread.
pub trait ExtractObserver {
    /// Overall fraction completed, `0.0..=1.0`.
    fn on_progress(&mut self, fraction: f32);
    /// An entry was written to `output_path`.
    fn on_file(&mut self, output_path: &str);
    /// The backend hit an error; extraction is about to fail.
    fn on_error(&mut self, message: &str);
}

/// Observer that ignores everything.
pub struct SilentObserver;

impl ExtractObserver for SilentObserver {
    fn on_progress(&mut self, _fraction: f32) {}
    fn on_file(&mut self, _output_path: &str) {}
    fn on_error(&mut self, _message: &str) {}
}
