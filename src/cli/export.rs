use std::io::Write;
use std::path::Path;

use csv::WriterBuilder;
use thiserror::Error;

use crate::validate::Report;

/// Column names of the violation CSV.
pub const VIOLATION_COLUMNS: [&str; 5] = ["category", "severity", "issue", "subjects", "details"];

/// Errors raised by CLI helpers.
#[derive(Debug, Error)]
pub enum CliError {
    /// IO error from file operations.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// CSV writing error.
    #[error(transparent)]
    Csv(#[from] csv::Error),
    /// JSON encoding error.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Writes every violation of `report` as a CSV row to `out`.
///
/// `subjects` joins the identifiers involved with `;` and `details` holds the
/// compact JSON of the whole item. Returns the number of rows written, not
/// counting the header.
pub fn write_violations<W: Write>(report: &Report, out: W) -> Result<usize, CliError> {
    let mut writer = WriterBuilder::new().from_writer(out);
    writer.write_record(VIOLATION_COLUMNS)?;
    let mut rows = 0;
    for (category, severity, violation) in report.violations() {
        let details = serde_json::to_string(violation)?;
        writer.write_record([
            category,
            severity.as_str(),
            violation.issue.as_str(),
            violation.subjects().join(";").as_str(),
            details.as_str(),
        ])?;
        rows += 1;
    }
    writer.flush()?;
    Ok(rows)
}

/// Writes the violation CSV to a file at `path`, replacing it if present.
pub fn export_violations(report: &Report, path: &Path) -> Result<usize, CliError> {
    let file = std::fs::File::create(path)?;
    write_violations(report, file)
}
