use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias for graph capability operations.
pub type Result<T> = std::result::Result<T, GraphError>;

/// Errors raised by a graph-query capability.
///
/// These describe infrastructure failures. Data-quality problems found while
/// traversing the graph are reported as violations instead.
#[derive(Debug, Error)]
pub enum GraphError {
    /// The backing store could not be reached or stopped answering.
    #[error("graph unavailable: {0}")]
    Unavailable(String),
    /// A document identifier was not in `collection/key` form.
    #[error("invalid document id '{0}'")]
    InvalidId(String),
    /// A document is missing identity fields or has mistyped ones.
    #[error("malformed document: {0}")]
    Malformed(String),
    /// A snapshot file could not be interpreted.
    #[error("snapshot {path}: {message}")]
    Snapshot {
        /// File that failed to load.
        path: PathBuf,
        /// What was wrong with it.
        message: String,
    },
    /// I/O error.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// JSON decoding error.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    /// The caller cancelled the operation.
    #[error("operation cancelled")]
    Cancelled,
}

impl GraphError {
    pub(crate) fn snapshot(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        GraphError::Snapshot {
            path: path.into(),
            message: message.into(),
        }
    }
}
