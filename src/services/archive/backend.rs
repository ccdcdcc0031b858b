use super::types::{ArchiveEntry, CancelHandle, ExtractObserver};
use crate::types::errors::ArchiveError;
use std::ops::{Deref, DerefMut};
use std::path::Path;

/// Asked for a password whenever the backend needs one. `None` means the
/// user gave up.
pub type PasswordPrompt<'a> = dyn FnMut() -> Option<String> + 'a;

/// An archive decoder holding at most one open archive.
///
/// Entries are only valid between a successful `open` and the matching
/// `close`. Callers should go through [`ArchiveSession`] so `close` runs on
/// every exit path.
pub trait ArchiveBackend {
    /// Open `path`. A wrong or missing password re-invokes `password` until
    /// the backend's retry allowance runs out.
    fn open(&mut self, path: &Path, password: &mut PasswordPrompt<'_>) -> Result<(), ArchiveError>;

    fn is_open(&self) -> bool;

    fn entries(&self) -> &[ArchiveEntry];

    fn entries_mut(&mut self) -> &mut [ArchiveEntry];

    /// Extract every entry whose `skip` flag is clear to
    /// `destination/output_path`. Flags are read once, when the call starts.
    fn extract(
        &mut self,
        destination: &Path,
        observer: &mut dyn ExtractObserver,
    ) -> Result<(), ArchiveError>;

    /// Handle for cooperative cancellation of a running `extract`.
    fn cancel_handle(&self) -> CancelHandle;

    fn cancel(&self) {
        self.cancel_handle().cancel();
    }

    /// Error from the most recent failed operation.
    fn last_error(&self) -> Option<&ArchiveError>;

    /// Release the archive and all of its entries.
    fn close(&mut self);
}

/// Scope guard around one open archive. Closes it when dropped.
pub struct ArchiveSession<'a> {
    backend: &'a mut dyn ArchiveBackend,
    open: bool,
}

impl<'a> ArchiveSession<'a> {
    /// Try to open `path`. The session is returned even when opening fails so
    /// callers can fall back to strategies that work on the raw file.
    pub fn open(
        backend: &'a mut dyn ArchiveBackend,
        path: &Path,
        password: &mut PasswordPrompt<'_>,
    ) -> (Self, Result<(), ArchiveError>) {
        let result = backend.open(path, password);
        let open = result.is_ok();
        (Self { backend, open }, result)
    }

    pub fn is_open(&self) -> bool {
        self.open
    }
}

impl<'a> Deref for ArchiveSession<'a> {
    type Target = dyn ArchiveBackend + 'a;

    fn deref(&self) -> &Self::Target {
        &*self.backend
    }
}

impl<'a> DerefMut for ArchiveSession<'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.backend
    }
}

impl Drop for ArchiveSession<'_> {
    fn drop(&mut self) {
        if self.open {
            self.backend.close();
            self.open = false;
        }
    }
}
