use crate::error::{Result, RotationError};
use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Lists the candidate backup names directly inside `directory`.
///
/// The scan is not recursive. Hidden entries (leading `.`), subdirectories and
/// names that are not valid UTF-8 are skipped. Names are returned sorted so
/// that the order does not depend on the filesystem.
pub fn list_directory(directory: &Path) -> Result<Vec<String>> {
    if !directory.exists() {
        return Err(RotationError::DirectoryNotFound {
            path: directory.to_path_buf(),
        });
    } else if !directory.is_dir() {
        return Err(RotationError::NotADirectory {
            path: directory.to_path_buf(),
        });
    }

    let mut names = Vec::new();

    for entry in WalkDir::new(directory)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;

        if entry.path().is_dir() {
            debug!("Skipping subdirectory {:?}", entry.path());
            continue;
        }

        let Some(name) = entry.file_name().to_str() else {
            warn!("Skipping entry with non UTF-8 name {:?}", entry.path());
            continue;
        };

        if name.starts_with('.') {
            continue;
        }

        names.push(name.to_string());
    }

    Ok(names)
}
