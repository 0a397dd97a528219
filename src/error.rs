//! Error kinds surfaced by the data-access layer.
//!
//! Codec and service operations return [`DataError`]; the CLI wraps these in
//! `anyhow` with extra context. Catalog scans never return these errors for a
//! single unreadable root, they log and skip instead.

use std::{io, path::PathBuf};

use thiserror::Error;

pub type DataResult<T> = std::result::Result<T, DataError>;

#[derive(Debug, Error)]
pub enum DataError {
    /// The file or table to read does not exist.
    #[error("Not found: {0}")]
    NotFound(String),
    /// The storage engine could not be opened or failed mid-operation.
    #[error("Storage unavailable for {path:?}: {reason}")]
    StorageUnavailable { path: PathBuf, reason: String },
    /// A dataset name matching neither supported storage convention.
    #[error("Invalid dataset reference '{0}'")]
    InvalidReference(String),
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),
    /// Structurally invalid CSV or table data.
    #[error("Malformed input: {0}")]
    MalformedInput(String),
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DataError {
    pub(crate) fn storage(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        DataError::StorageUnavailable {
            path: path.into(),
            reason: err.to_string(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        DataError::Io {
            path: path.into(),
            source,
        }
    }

    /// True for the kinds the boundary layer reports as "not found".
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DataError::NotFound(_) | DataError::StorageUnavailable { .. }
        )
    }
}
