use std::path::{Path, PathBuf};

use crate::types::GraphError;
use crate::validate::ValidateError;
use thiserror::Error;

/// Error type for administrative operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// No snapshot at the specified path.
    #[error("snapshot not found: {0}")]
    MissingSnapshot(PathBuf),
    /// The snapshot could not be loaded or queried.
    #[error(transparent)]
    Graph(#[from] GraphError),
    /// Validation aborted.
    #[error(transparent)]
    Validate(#[from] ValidateError),
}

/// Result type alias for administrative operations.
pub type Result<T> = std::result::Result<T, AdminError>;

impl AdminError {
    pub(crate) fn missing_snapshot(path: impl AsRef<Path>) -> Self {
        AdminError::MissingSnapshot(path.as_ref().to_path_buf())
    }
}
