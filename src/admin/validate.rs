use std::path::Path;
use std::time::Instant;

use tracing::info;

use crate::admin::options::AdminOpenOptions;
use crate::admin::util::open_graph;
use crate::admin::Result;
use crate::validate::{validate_with_cancel as run_checks, CancelToken, Report, ValidateOptions};

/// Loads the snapshot at `path` and runs the standard checks against it.
pub fn validate(
    path: impl AsRef<Path>,
    opts: &AdminOpenOptions,
    validate_opts: &ValidateOptions,
) -> Result<Report> {
    validate_with_cancel(path, opts, validate_opts, &CancelToken::new())
}

/// Like [`validate`], stopping early once `cancel` is triggered.
pub fn validate_with_cancel(
    path: impl AsRef<Path>,
    opts: &AdminOpenOptions,
    validate_opts: &ValidateOptions,
    cancel: &CancelToken,
) -> Result<Report> {
    let path = path.as_ref();
    let started = Instant::now();
    let graph = open_graph(path, opts)?;
    let report = run_checks(&graph, validate_opts, cancel)?;
    info!(
        path = %path.display(),
        ok = report.ok,
        total_issues = report.total_issues,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "admin.validate.completed"
    );
    Ok(report)
}
