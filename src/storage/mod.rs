//! Graph model and the read-only query capability.
//!
//! The validator only ever talks to [`GraphQuery`]. [`MemoryGraph`] is the
//! bundled implementation, built in code or loaded from an exported snapshot.

pub mod snapshot;

mod adjacency;
mod graph;
mod layout;
mod memory;
mod types;

/// Edge direction and edge selection.
pub use adjacency::{Dir, EdgeFilter};

/// Query capability and its option types.
pub use graph::{GraphQuery, NodeFilter, TraverseOptions, Visit};

/// Collection naming.
pub use layout::CollectionLayout;

/// In-memory snapshot implementation.
pub use memory::{CollectionInfo, CollectionKind, MemoryGraph, MemoryGraphBuilder};

/// Nodes, edges and well-known field values.
pub use types::{Edge, Node, FIELD_STATUS, FIELD_TYPE, STATUS_ACTIVE, STATUS_PROPOSAL};
