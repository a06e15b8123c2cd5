//! Error type shared by every table operation.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CsvError {
    /// The concurrency limit was zero or negative.
    #[error("invalid concurrency limit {value}: must be at least 1")]
    InvalidLimit { value: i64 },

    /// The path could not be opened, created or read.
    #[error("open {}: {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A malformed record was found while reading. `record` is 1-based.
    #[error("parse CSV record #{record} in {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        record: usize,
        #[source]
        source: csv::Error,
    },

    /// The per-record processor rejected a decoded record.
    #[error("process CSV record #{record}: {message}")]
    Process { record: usize, message: String },

    /// A record could not be encoded.
    #[error("encode CSV record #{record}: {message}")]
    Encode { record: usize, message: String },

    /// An encoded record could not be written to the destination.
    #[error("write CSV record #{record}: {source}")]
    Write {
        record: usize,
        #[source]
        source: io::Error,
    },

    #[error("flush {}: {source}", .path.display())]
    Flush {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("build worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),

    #[error("load settings from {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },
}

impl CsvError {
    pub(crate) fn file(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::File {
            path: path.into(),
            source,
        }
    }

    /// Whether the operation failed before any record was touched.
    #[must_use]
    pub fn is_file_error(&self) -> bool {
        matches!(self, Self::File { .. })
    }
}

pub type Result<T> = std::result::Result<T, CsvError>;
