#![forbid(unsafe_code)]

//! Command-line support code shared by the `coati` binary.
//!
//! Currently this is the CSV export of validation findings.

/// Export of violations to CSV.
///
/// Writes one row per violation so reports can be triaged in a spreadsheet.
pub mod export;
