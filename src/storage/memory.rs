use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::types::{DocId, Result};

use super::adjacency::{Dir, EdgeFilter};
use super::graph::{GraphQuery, NodeFilter};
use super::types::{Edge, Node};

/// Kind of a collection in a snapshot.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionKind {
    /// Holds nodes.
    Document,
    /// Holds edges.
    Edge,
}

/// Summary of one collection in a snapshot.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct CollectionInfo {
    /// Collection name.
    pub name: String,
    /// Whether the collection holds nodes or edges.
    #[serde(rename = "type")]
    pub kind: CollectionKind,
    /// Number of documents.
    pub count: usize,
}

#[derive(Debug, Default)]
struct EdgeCollection {
    edges: Vec<Edge>,
    outbound: FxHashMap<DocId, Vec<usize>>,
    inbound: FxHashMap<DocId, Vec<usize>>,
}

impl EdgeCollection {
    fn push(&mut self, edge: Edge) {
        let slot = self.edges.len();
        self.outbound.entry(edge.from.clone()).or_default().push(slot);
        self.inbound.entry(edge.to.clone()).or_default().push(slot);
        self.edges.push(edge);
    }

    fn touching(&self, id: &DocId, dir: Dir) -> impl Iterator<Item = &Edge> + '_ {
        let out = dir
            .includes_out()
            .then(|| self.outbound.get(id))
            .flatten()
            .into_iter()
            .flatten();
        // A self-loop is indexed on both sides; only report it once for `Both`.
        let skip_loops = dir.includes_out();
        let inb = dir
            .includes_in()
            .then(|| self.inbound.get(id))
            .flatten()
            .into_iter()
            .flatten()
            .filter(move |slot| !(skip_loops && self.edges[**slot].from == self.edges[**slot].to));
        out.chain(inb).map(move |slot| &self.edges[*slot])
    }
}

/// Immutable, fully in-memory graph snapshot.
///
/// Nodes are kept ordered by identifier and edges in insertion order, which
/// makes every query result deterministic.
#[derive(Debug, Default)]
pub struct MemoryGraph {
    nodes: BTreeMap<DocId, Node>,
    document_collections: BTreeMap<String, usize>,
    edge_collections: BTreeMap<String, EdgeCollection>,
}

impl MemoryGraph {
    /// An empty graph.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Starts building a graph.
    pub fn builder() -> MemoryGraphBuilder {
        MemoryGraphBuilder::default()
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges across all edge collections.
    pub fn edge_count(&self) -> usize {
        self.edge_collections.values().map(|c| c.edges.len()).sum()
    }

    /// Returns true when the graph has no nodes and no edges.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edge_count() == 0
    }

    /// Lists every collection, sorted by name.
    pub fn collections(&self) -> Vec<CollectionInfo> {
        let docs = self
            .document_collections
            .iter()
            .map(|(name, count)| CollectionInfo {
                name: name.clone(),
                kind: CollectionKind::Document,
                count: *count,
            });
        let edges = self
            .edge_collections
            .iter()
            .map(|(name, coll)| CollectionInfo {
                name: name.clone(),
                kind: CollectionKind::Edge,
                count: coll.edges.len(),
            });
        let mut all: Vec<CollectionInfo> = docs.chain(edges).collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        all
    }
}

impl GraphQuery for MemoryGraph {
    fn node(&self, id: &DocId) -> Result<Option<Node>> {
        Ok(self.nodes.get(id).cloned())
    }

    fn nodes(&self, filter: &NodeFilter) -> Result<Vec<Node>> {
        Ok(self
            .nodes
            .values()
            .filter(|node| filter.matches(node))
            .cloned()
            .collect())
    }

    fn edges(&self, collection: &str) -> Result<Vec<Edge>> {
        Ok(self
            .edge_collections
            .get(collection)
            .map(|coll| coll.edges.clone())
            .unwrap_or_default())
    }

    fn adjacent(&self, id: &DocId, dir: Dir, filter: &EdgeFilter) -> Result<Vec<Edge>> {
        let Some(coll) = self.edge_collections.get(&filter.collection) else {
            return Ok(Vec::new());
        };
        Ok(coll
            .touching(id, dir)
            .filter(|edge| filter.matches(edge))
            .cloned()
            .collect())
    }
}

/// Incrementally assembles a [`MemoryGraph`].
#[derive(Debug, Default)]
pub struct MemoryGraphBuilder {
    graph: MemoryGraph,
}

impl MemoryGraphBuilder {
    /// Declares an edge collection, possibly empty.
    pub fn edge_collection(mut self, name: &str) -> Self {
        self.declare_edges(name);
        self
    }

    /// Adds a node, replacing any node with the same identifier.
    pub fn node(mut self, node: Node) -> Self {
        self.insert_node(node);
        self
    }

    /// Adds an edge to the collection named by its identifier.
    pub fn edge(mut self, edge: Edge) -> Self {
        self.insert_edge(edge);
        self
    }

    /// Returns true when a node with `id` was already added.
    pub fn contains_node(&self, id: &DocId) -> bool {
        self.graph.nodes.contains_key(id)
    }

    /// Finishes the graph.
    pub fn build(self) -> MemoryGraph {
        self.graph
    }

    pub(crate) fn declare_documents(&mut self, name: &str) {
        self.graph
            .document_collections
            .entry(name.to_string())
            .or_insert(0);
    }

    pub(crate) fn declare_edges(&mut self, name: &str) {
        self.graph
            .edge_collections
            .entry(name.to_string())
            .or_default();
    }

    pub(crate) fn insert_node(&mut self, node: Node) {
        let collection = node.id.collection().to_string();
        if self.graph.nodes.insert(node.id.clone(), node).is_none() {
            *self
                .graph
                .document_collections
                .entry(collection)
                .or_insert(0) += 1;
        }
    }

    pub(crate) fn insert_edge(&mut self, edge: Edge) {
        self.graph
            .edge_collections
            .entry(edge.id.collection().to_string())
            .or_default()
            .push(edge);
    }
}
