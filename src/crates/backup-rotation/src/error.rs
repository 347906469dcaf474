use crate::deleter::PurgeReport;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when building or rotating a set of backups
#[derive(Debug, Error)]
pub enum RotationError {
    /// The backup directory does not exist
    #[error("Backup directory not found: {}", .path.display())]
    DirectoryNotFound { path: PathBuf },

    /// The backup path exists but is not a directory
    #[error("Not a directory: {}", .path.display())]
    NotADirectory { path: PathBuf },

    /// I/O error when reading the backup directory
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error while walking the backup directory
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Some deletions failed during a purge. The pass still ran to completion.
    #[error(
        "Failed to delete {} of {} removable backups",
        .0.failed.len(),
        .0.failed.len() + .0.deleted.len()
    )]
    PartialPurge(PurgeReport),
}

/// A specialized Result type for backup rotation operations
pub type Result<T> = std::result::Result<T, RotationError>;
