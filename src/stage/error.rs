//! Error types for staging an entry's inputs.

use std::path::PathBuf;
use thiserror::Error;

use crate::queue::{self, EntryId};

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while staging inputs with
/// [`write_from_queue`](super::write_from_queue).
///
/// No variant is recovered from internally: the first failure aborts the
/// remaining steps and anything already on disk stays there.
#[derive(Debug, Error)]
pub enum Error {
    /// The destination exists but is neither a regular file nor a directory.
    #[error("destination '{}' is not valid: {reason}", .path.display())]
    InvalidDestination { path: PathBuf, reason: String },

    /// Creating a missing destination directory failed.
    ///
    /// Only the final path component is ever created, so a missing parent
    /// ends up here too.
    #[error("failed to create destination directory '{}': {source}", .path.display())]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The queue has no entry with this identifier.
    #[error("entry '{entry}' not found in queue")]
    EntryNotFound { entry: EntryId },

    /// Writing POSCAR, INCAR, or the queue's auxiliary files failed.
    #[error("failed to write '{}': {source}", .path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    /// The queue failed to produce an entry's data for a reason other than
    /// the entry being absent.
    #[error("queue failed to provide entry data: {0}")]
    Queue(#[source] queue::Error),
}

impl Error {
    /// Creates an [`InvalidDestination`](Error::InvalidDestination) error.
    pub fn invalid_destination(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidDestination {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates a [`WriteFailed`](Error::WriteFailed) error.
    pub fn write_failed(path: impl Into<PathBuf>, source: impl Into<BoxError>) -> Self {
        Self::WriteFailed {
            path: path.into(),
            source: source.into(),
        }
    }

    /// Classifies a failure from one of the queue's read operations.
    pub(super) fn from_fetch(err: queue::Error) -> Self {
        match err {
            queue::Error::EntryNotFound(entry) => Self::EntryNotFound { entry },
            other => Self::Queue(other),
        }
    }
}
