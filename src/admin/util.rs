use std::path::Path;

use tracing::debug;

use crate::admin::error::{AdminError, Result};
use crate::admin::options::AdminOpenOptions;
use crate::storage::{snapshot, MemoryGraph};

/// Loads the snapshot at `path`.
///
/// # Errors
///
/// Returns [`AdminError::MissingSnapshot`] if nothing exists at `path` and
/// `empty_if_missing` is false, or a graph error if loading fails.
pub fn open_graph(path: &Path, opts: &AdminOpenOptions) -> Result<MemoryGraph> {
    if !path.exists() {
        if opts.empty_if_missing {
            debug!(path = %path.display(), "admin.open.empty");
            return Ok(MemoryGraph::empty());
        }
        return Err(AdminError::missing_snapshot(path));
    }
    Ok(snapshot::load(path, &opts.layout)?)
}
