use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("data directory {0:?} does not exist")]
    DirectoryMissing(PathBuf),

    #[error("no data file matching '{keyword}' in {dir:?}")]
    NoMatch { keyword: String, dir: PathBuf },

    #[error("input file {0:?} does not exist")]
    FileMissing(PathBuf),

    #[error("listing data directory {dir:?}")]
    ListDirectory {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unable to read {path:?} ({})", attempts.join("; "))]
    Unreadable { path: PathBuf, attempts: Vec<String> },
}

impl LoadError {
    /// Source unavailable, as opposed to present but unreadable.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            LoadError::DirectoryMissing(_) | LoadError::NoMatch { .. } | LoadError::FileMissing(_)
        )
    }
}
