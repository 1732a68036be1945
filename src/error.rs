//! Error types shared across the ingestion pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// A single input line that could not be turned into an observation.
#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },

    #[error("invalid timestamp `{0}`")]
    Timestamp(String),

    #[error("invalid value `{value}` for {field}")]
    Number { field: &'static str, value: String },

    /// `NaN` or an infinity, which the store cannot hold.
    #[error("non-finite value `{value}` for {field}")]
    NonFinite { field: &'static str, value: String },

    #[error("line is not valid UTF-8")]
    Encoding,
}

#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing database could not be opened or initialised.
    #[error("storage unavailable at {}", .path.display())]
    Unavailable {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    /// An ad-hoc query was refused before reaching storage.
    #[error("query rejected: {0}")]
    Rejected(String),

    #[error("store connection lock poisoned")]
    Poisoned,
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("directory not found: {0}")]
    NotFound(PathBuf),

    #[error("no csv files in {0}")]
    Empty(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// The background ingestion task went away without reporting.
    #[error("ingestion task aborted: {0}")]
    Aborted(String),
}

// -- Tests -------------------------------------------------------------------
