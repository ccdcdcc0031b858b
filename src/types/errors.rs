use serde::Serialize;
use thiserror::Error;

/// Failures reported by an archive backend.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("no archive is open")]
    NotOpen,
    #[error("archive not found: {0}")]
    NotFound(String),
    #[error("password required to open this archive")]
    PasswordRequired,
    #[error("unsupported archive type: {0}")]
    UnsupportedFormat(String),
    #[error("failed to open archive: {0}")]
    Open(String),
    #[error("archive invalid: {0}")]
    Invalid(String),
    #[error("internal library error: {0}")]
    Library(String),
    #[error("extraction failed: {0}")]
    Extract(String),
    #[error("extraction cancelled")]
    Cancelled,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ArchiveError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ArchiveError::Cancelled)
    }
}

/// Errors a strategy hands back to the dispatcher.
#[derive(Debug, Error)]
pub enum InstallerError {
    /// The strategy matched structurally but cannot handle this archive.
    /// The dispatcher logs it and moves on to the next strategy.
    #[error("installer incompatible: {0}")]
    Incompatible(String),
    #[error("installer failed: {0}")]
    Failed(String),
    /// The user stopped the install from inside the strategy.
    #[error("installer cancelled")]
    Cancelled,
}

impl From<InstallError> for InstallerError {
    fn from(error: InstallError) -> Self {
        if error.is_cancellation() {
            InstallerError::Cancelled
        } else {
            InstallerError::Failed(error.to_string())
        }
    }
}

#[derive(Debug, Error)]
pub enum InstallError {
    #[error("File format \"{0}\" not supported")]
    UnsupportedFormat(String),
    #[error("Failed to open archive: {0}")]
    BackendOpen(#[source] ArchiveError),
    #[error("Extracting failed: {0}")]
    Extraction(#[source] ArchiveError),
    #[error("Installation cancelled")]
    Cancelled,
    #[error("None of the available installer plugins were able to handle that archive")]
    NoCompatibleInstaller,
    #[error("Installer \"{name}\" incompatible: {reason}")]
    StrategyIncompatible { name: String, reason: String },
    #[error("Installation aborted: target directory already exists")]
    OverwriteAborted,
    #[error("Failed to create backup: {0}")]
    BackupFailed(String),
    #[error("Installer \"{name}\" failed: {reason}")]
    Installer { name: String, reason: String },
    #[error("Metadata error: {0}")]
    Metadata(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl InstallError {
    /// User-initiated stops that end an install without an error report.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, InstallError::Cancelled | InstallError::OverwriteAborted)
    }
}

impl From<ArchiveError> for InstallError {
    fn from(error: ArchiveError) -> Self {
        match error {
            ArchiveError::Cancelled => InstallError::Cancelled,
            other => InstallError::Extraction(other),
        }
    }
}

impl Serialize for InstallError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.to_string().as_ref())
    }
}

pub type InstallResult<T> = Result<T, InstallError>;
