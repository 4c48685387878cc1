//! Output directory setup.
//!
//! Every run starts from a clean slate: the card directory is removed
//! recursively if it exists, then recreated. Cards from a previous run never
//! survive into the next one, which keeps the "at most one file per handle"
//! invariant trivially true.

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilesystemError {
    #[error("failed to remove {path}: {source}")]
    Remove {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to create {path}: {source}")]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Wipe and recreate the output directory.
///
/// Intermediate path components are created as needed.
pub fn prepare(dir: &Path) -> Result<(), FilesystemError> {
    if dir.exists() {
        std::fs::remove_dir_all(dir).map_err(|source| FilesystemError::Remove {
            path: dir.to_path_buf(),
            source,
        })?;
    }
    std::fs::create_dir_all(dir).map_err(|source| FilesystemError::Create {
        path: dir.to_path_buf(),
        source,
    })
}
