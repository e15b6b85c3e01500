//! Loading exported graphs from disk.
//!
//! Two layouts are accepted:
//!
//! - a directory with one file per collection, either `<name>.json` holding a
//!   JSON array of documents or `<name>.jsonl` holding one document per line;
//! - a single JSON file holding an object that maps collection names to
//!   arrays of documents.
//!
//! A collection is treated as an edge collection when its documents carry
//! `_from` and `_to`, or when it is empty and the layout names it as one.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::types::{DocId, GraphError, Result};

use super::layout::CollectionLayout;
use super::memory::{MemoryGraph, MemoryGraphBuilder};
use super::types::{is_edge_document, Edge, Node};

type Document = Map<String, Value>;

/// Loads a snapshot from a directory or a single JSON file.
pub fn load(path: impl AsRef<Path>, layout: &CollectionLayout) -> Result<MemoryGraph> {
    let path = path.as_ref();
    let metadata = fs::metadata(path)?;
    let mut loader = Loader::new(layout);
    if metadata.is_dir() {
        for (name, file) in collection_files(path)? {
            let docs = read_collection_file(&file)?;
            loader.ingest(&name, &file, docs)?;
        }
    } else {
        let contents = fs::read_to_string(path)?;
        let root: Value = serde_json::from_str(&contents)
            .map_err(|err| GraphError::snapshot(path, err.to_string()))?;
        let Value::Object(collections) = root else {
            return Err(GraphError::snapshot(
                path,
                "expected an object mapping collection names to documents",
            ));
        };
        for (name, value) in collections {
            let docs = into_documents(path, &name, value)?;
            loader.ingest(&name, path, docs)?;
        }
    }
    let graph = loader.finish();
    info!(
        path = %path.display(),
        collections = graph.collections().len(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "snapshot.loaded"
    );
    Ok(graph)
}

struct Loader<'a> {
    layout: &'a CollectionLayout,
    builder: MemoryGraphBuilder,
    edge_ids: HashSet<DocId>,
}

impl<'a> Loader<'a> {
    fn new(layout: &'a CollectionLayout) -> Self {
        Self {
            layout,
            builder: MemoryGraph::builder(),
            edge_ids: HashSet::new(),
        }
    }

    fn ingest(&mut self, name: &str, origin: &Path, docs: Vec<Document>) -> Result<()> {
        let is_edges = match docs.first() {
            Some(first) => is_edge_document(first),
            None => self.layout.is_edge_collection(name),
        };
        debug!(
            collection = name,
            documents = docs.len(),
            edges = is_edges,
            "snapshot.collection"
        );
        if is_edges {
            self.builder.declare_edges(name);
        } else {
            self.builder.declare_documents(name);
        }
        for (position, doc) in docs.into_iter().enumerate() {
            let located = |err: GraphError| {
                GraphError::snapshot(origin, format!("{name}[{position}]: {err}"))
            };
            if is_edges {
                let edge = Edge::from_document(name, doc).map_err(located)?;
                if !self.edge_ids.insert(edge.id.clone()) {
                    return Err(located(duplicate(&edge.id)));
                }
                self.builder.insert_edge(edge);
            } else {
                if is_edge_document(&doc) {
                    return Err(located(GraphError::Malformed(
                        "edge document in a document collection".into(),
                    )));
                }
                let node = Node::from_document(name, doc).map_err(located)?;
                if self.builder.contains_node(&node.id) {
                    return Err(located(duplicate(&node.id)));
                }
                self.builder.insert_node(node);
            }
        }
        Ok(())
    }

    fn finish(self) -> MemoryGraph {
        self.builder.build()
    }
}

fn duplicate(id: &DocId) -> GraphError {
    GraphError::Malformed(format!("duplicate document {id}"))
}

fn collection_files(dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let is_collection = matches!(
            path.extension().and_then(|ext| ext.to_str()),
            Some("json") | Some("jsonl")
        );
        let stem = path.file_stem().and_then(|stem| stem.to_str());
        if let (true, Some(stem)) = (is_collection, stem) {
            files.push((stem.to_string(), path.clone()));
        }
    }
    files.sort();
    let mut seen = HashSet::new();
    for (name, path) in &files {
        if !seen.insert(name.as_str()) {
            return Err(GraphError::snapshot(
                path,
                format!("collection {name} is exported more than once"),
            ));
        }
    }
    Ok(files)
}

fn read_collection_file(path: &Path) -> Result<Vec<Document>> {
    let contents = fs::read_to_string(path)?;
    let name = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or_default();
    if path.extension().and_then(|ext| ext.to_str()) == Some("jsonl") {
        let mut docs = Vec::new();
        for (line_no, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let value: Value = serde_json::from_str(line).map_err(|err| {
                GraphError::snapshot(path, format!("line {}: {err}", line_no + 1))
            })?;
            match value {
                Value::Object(doc) => docs.push(doc),
                _ => {
                    return Err(GraphError::snapshot(
                        path,
                        format!("line {}: expected a JSON object", line_no + 1),
                    ))
                }
            }
        }
        Ok(docs)
    } else {
        let value: Value = serde_json::from_str(&contents)
            .map_err(|err| GraphError::snapshot(path, err.to_string()))?;
        into_documents(path, name, value)
    }
}

fn into_documents(path: &Path, name: &str, value: Value) -> Result<Vec<Document>> {
    let Value::Array(items) = value else {
        return Err(GraphError::snapshot(
            path,
            format!("collection {name} must be an array of documents"),
        ));
    };
    items
        .into_iter()
        .enumerate()
        .map(|(position, item)| match item {
            Value::Object(doc) => Ok(doc),
            _ => Err(GraphError::snapshot(
                path,
                format!("{name}[{position}]: expected a JSON object"),
            )),
        })
        .collect()
}
