use crate::types::errors::{ArchiveError, InstallError, InstallerError};

#[test]
fn test_install_error_from_cancelled_archive_error() {
    let err = InstallError::from(ArchiveError::Cancelled);
    assert!(matches!(err, InstallError::Cancelled));
    assert!(err.is_cancellation());
}

#[test]
fn test_install_error_from_extract_failure_is_fatal() {
    let err = InstallError::from(ArchiveError::Extract("crc mismatch".into()));

    match &err {
        InstallError::Extraction(inner) => {
            assert!(inner.to_string().contains("crc mismatch"));
        }
        _ => panic!("Expected InstallError::Extraction"),
    }
    assert!(!err.is_cancellation());
}

#[test]
fn test_overwrite_abort_is_a_cancellation() {
    assert!(InstallError::OverwriteAborted.is_cancellation());
    assert!(!InstallError::NoCompatibleInstaller.is_cancellation());
    assert!(!InstallError::BackupFailed("disk full".into()).is_cancellation());
}

#[test]
fn test_install_error_serialization() {
    let err = InstallError::UnsupportedFormat("tar.gz".to_string());

    // InstallError serializes as just its Display string
    let serialized = serde_json::to_string(&err).unwrap();
    assert_eq!(serialized, "\"File format \\\"tar.gz\\\" not supported\"");
}

#[test]
fn test_installer_error_from_install_error_keeps_message() {
    let err = InstallerError::from(InstallError::NoCompatibleInstaller);
    match err {
        InstallerError::Failed(msg) => assert!(msg.contains("None of the available")),
        _ => panic!("Expected InstallerError::Failed"),
    }
}

#[test]
fn test_installer_error_keeps_cancellation() {
    assert!(matches!(
        InstallerError::from(InstallError::OverwriteAborted),
        InstallerError::Cancelled
    ));
    assert!(matches!(
        InstallerError::from(InstallError::Cancelled),
        InstallerError::Cancelled
    ));
}
