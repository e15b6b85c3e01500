//! Shared identifier and error types.

mod error;
mod id;

pub use error::{GraphError, Result};
pub use id::DocId;
