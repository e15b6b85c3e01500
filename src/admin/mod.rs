#![forbid(unsafe_code)]

//! Snapshot administration.
//!
//! Path-based entry points used by the command-line tool: open an exported
//! graph, validate it, and summarize its collections.

mod error;
mod options;
mod stats;
mod util;
mod validate;

/// Error types for administrative operations.
pub use error::{AdminError, Result};

/// Options for opening a snapshot.
pub use options::AdminOpenOptions;

/// Collection statistics.
///
/// Counts documents per collection and splits collections into document and
/// edge collections.
pub use stats::{collections, stats, StatsReport};

/// Snapshot opening helper.
pub use util::open_graph;

/// Integrity validation of a snapshot on disk.
pub use validate::{validate, validate_with_cancel};
