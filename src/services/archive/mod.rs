//! Archive backends: open, list, selectively extract, cancel.

mod backend;
mod codec;
mod types;

// Re-export public API
pub use backend::{ArchiveBackend, ArchiveSession, PasswordPrompt};
pub use codec::{normalize_entry_path, CodecArchive, DEFAULT_PASSWORD_ATTEMPTS};
pub use types::{
    ArchiveEntry, ArchiveFormat, CancelHandle, ExtractObserver, SilentObserver, ARCHIVE_SEPARATOR,
};

#[cfg(test)]
#[path = "tests/codec_tests.rs"]
mod tests;
