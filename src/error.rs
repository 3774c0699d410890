//! Error types for size parsing and pruning runs.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// A size expression such as `"512MiB"` could not be turned into bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SizeParseError {
    #[error("size expression is empty")]
    Empty,

    #[error("invalid size {input:?}: expected an unsigned integer with an optional KB/MB/GB/KiB/MiB/GiB suffix")]
    InvalidNumber { input: String },

    #[error("size {input:?} does not fit in 64 bits")]
    Overflow { input: String },
}

/// A fatal condition that halts a pruning run.
///
/// Files deleted before the error stay deleted; nothing is retried.
#[derive(Debug, Error)]
pub enum PruneError {
    #[error("{} is not a directory", path.display())]
    NotADirectory { path: PathBuf },

    #[error("failed to list {}: {source}", path.display())]
    Enumerate {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read metadata of {}: {source}", path.display())]
    Metadata {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to delete {}: {source}", path.display())]
    Delete {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl PruneError {
    /// Path the failure is about.
    pub fn path(&self) -> &std::path::Path {
        match self {
            PruneError::NotADirectory { path }
            | PruneError::Enumerate { path, .. }
            | PruneError::Metadata { path, .. }
            | PruneError::Delete { path, .. } => path,
        }
    }
}

impl From<walkdir::Error> for PruneError {
    fn from(err: walkdir::Error) -> Self {
        let path = err.path().map(|p| p.to_path_buf()).unwrap_or_default();
        let source = err
            .into_io_error()
            .unwrap_or_else(|| io::Error::other("filesystem loop detected"));
        PruneError::Enumerate { path, source }
    }
}
