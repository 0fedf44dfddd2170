use super::EntryId;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by queue implementations.
#[derive(Debug, Error)]
pub enum Error {
    /// The queue has no entry with this identifier.
    #[error("entry '{0}' not found in queue")]
    EntryNotFound(EntryId),

    /// The entry exists but its stored content cannot be used.
    #[error("entry '{entry}' is invalid: {detail}")]
    InvalidEntry { entry: EntryId, detail: String },

    #[error("queue root '{}' is not a directory", .0.display())]
    InvalidRoot(PathBuf),

    #[error("I/O operation failed on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An auxiliary input file could not be rendered or written.
    #[error("failed to write '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: crate::io::Error,
    },

    #[error("failed to import '{}': {source}", .path.display())]
    Import {
        path: PathBuf,
        #[source]
        source: crate::io::Error,
    },

    #[error("failed to parse entry file '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize entry '{entry}': {source}")]
    Serialize {
        entry: EntryId,
        #[source]
        source: toml::ser::Error,
    },
}

impl Error {
    pub fn invalid_entry(entry: &EntryId, detail: impl Into<String>) -> Self {
        Self::InvalidEntry {
            entry: entry.clone(),
            detail: detail.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    #[inline]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::EntryNotFound(_))
    }
}
