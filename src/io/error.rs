use super::Format;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O operation failed: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("failed to parse {format} data: {details} (at line {line})")]
    Parse {
        format: Format,
        line: usize,
        details: String,
    },

    #[error("cannot write {format}: {details}")]
    InvalidData { format: Format, details: String },
}

impl Error {
    pub fn parse(format: Format, line: usize, details: impl Into<String>) -> Self {
        Self::Parse {
            format,
            line,
            details: details.into(),
        }
    }

    pub fn invalid_data(format: Format, details: impl Into<String>) -> Self {
        Self::InvalidData {
            format,
            details: details.into(),
        }
    }
}
