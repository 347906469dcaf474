use std::io;
use std::path::Path;
use thiserror::Error;

/// Removes a single backup artifact.
pub trait Deleter {
    /// Deletes `name` inside `directory`.
    fn delete(&mut self, directory: &Path, name: &str) -> io::Result<()>;
}

/// Deletes backups from the local filesystem.
///
/// Only regular files are removed; the deleter never recurses.
#[derive(Debug, Default, Copy, Clone)]
pub struct FsDeleter;

impl Deleter for FsDeleter {
    fn delete(&mut self, directory: &Path, name: &str) -> io::Result<()> {
        std::fs::remove_file(directory.join(name))
    }
}

impl<F> Deleter for F
where
    F: FnMut(&Path, &str) -> io::Result<()>,
{
    fn delete(&mut self, directory: &Path, name: &str) -> io::Result<()> {
        self(directory, name)
    }
}

/// A backup that could not be deleted.
#[derive(Debug, Error)]
#[error("Failed to delete backup {name:?}: {source}")]
pub struct DeletionFailure {
    pub name: String,
    #[source]
    pub source: io::Error,
}

/// Outcome of a purge pass.
#[derive(Debug, Default)]
pub struct PurgeReport {
    /// Names deleted, in the order they were processed
    pub deleted: Vec<String>,
    /// Deletions that failed; the pass continued past each of them
    pub failed: Vec<DeletionFailure>,
}

impl PurgeReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// Total number of backups the pass attempted to delete.
    pub fn attempted(&self) -> usize {
        self.deleted.len() + self.failed.len()
    }
}
