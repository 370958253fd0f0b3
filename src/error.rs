//! Error types for teddy.
//!
//! Not finding anything is never an error: searches return an empty list and
//! merges silently skip. The variants below cover malformed input and I/O.

use std::io;
use thiserror::Error;

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A key path string does not follow the `name[index]` segment grammar
    #[error("malformed key path {input:?} at position {position}: {reason}")]
    MalformedPath {
        input: String,
        position: usize,
        reason: String,
    },

    /// The document is a scalar where a mapping or sequence was required
    #[error("document is not traversable: expected object or array, found {0}")]
    NotTraversable(&'static str),

    #[error("no document loaded")]
    NoDocument,

    #[error("path not found: {0}")]
    PathNotFound(String),

    /// A replacement would change the structural kind of a node
    #[error("kind mismatch: expected {expected}, found {found}")]
    KindMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("invalid key pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("loading was canceled")]
    Canceled,

    #[error("invalid byte size: {0:?}")]
    InvalidByteSize(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("logging setup failed: {0}")]
    Logging(String),
}

impl Error {
    pub(crate) fn malformed_path(
        input: &str,
        position: usize,
        reason: impl Into<String>,
    ) -> Self {
        Error::MalformedPath {
            input: input.to_string(),
            position,
            reason: reason.into(),
        }
    }
}
