use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::admin::options::AdminOpenOptions;
use crate::admin::util::open_graph;
use crate::admin::Result;
use crate::storage::{CollectionInfo, CollectionKind, MemoryGraph};

/// Collection-level summary of a snapshot.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsReport {
    /// Number of collections of either kind.
    pub total_collections: usize,
    /// Number of document collections.
    pub document_collections: usize,
    /// Number of edge collections.
    pub edge_collections: usize,
    /// Documents and edges across every collection.
    pub total_documents: usize,
    /// Per-collection breakdown, sorted by name.
    pub collections: Vec<CollectionInfo>,
}

impl StatsReport {
    /// Summarizes an already loaded graph.
    pub fn from_graph(graph: &MemoryGraph) -> Self {
        let collections = graph.collections();
        let document_collections = collections
            .iter()
            .filter(|c| c.kind == CollectionKind::Document)
            .count();
        Self {
            total_collections: collections.len(),
            document_collections,
            edge_collections: collections.len() - document_collections,
            total_documents: collections.iter().map(|c| c.count).sum(),
            collections,
        }
    }
}

/// Summarizes the collections of the snapshot at `path`.
pub fn stats(path: impl AsRef<Path>, opts: &AdminOpenOptions) -> Result<StatsReport> {
    let path = path.as_ref();
    let graph = open_graph(path, opts)?;
    let report = StatsReport::from_graph(&graph);
    info!(
        path = %path.display(),
        collections = report.total_collections,
        documents = report.total_documents,
        "admin.stats.completed"
    );
    Ok(report)
}

/// Lists the collections of the snapshot at `path`, sorted by name.
pub fn collections(path: impl AsRef<Path>, opts: &AdminOpenOptions) -> Result<Vec<CollectionInfo>> {
    let graph = open_graph(path.as_ref(), opts)?;
    Ok(graph.collections())
}
