use std::collections::{HashSet, VecDeque};

use crate::types::{DocId, Result};

use super::adjacency::{Dir, EdgeFilter};
use super::types::{Edge, Node};

/// Node selection for [`GraphQuery::nodes`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct NodeFilter {
    /// Restrict to one collection.
    pub collection: Option<String>,
    /// Restrict to one `status` value.
    pub status: Option<String>,
}

impl NodeFilter {
    /// Matches every node.
    pub fn all() -> Self {
        Self::default()
    }

    /// Matches nodes in `collection`.
    pub fn in_collection(collection: impl Into<String>) -> Self {
        Self {
            collection: Some(collection.into()),
            status: None,
        }
    }

    /// Additionally requires `status`.
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Returns true when `node` passes the filter.
    pub fn matches(&self, node: &Node) -> bool {
        if let Some(collection) = &self.collection {
            if !node.id.in_collection(collection) {
                return false;
            }
        }
        match &self.status {
            Some(status) => node.status() == Some(status.as_str()),
            None => true,
        }
    }
}

/// Options for bounded breadth-first traversal.
#[derive(Clone, Debug)]
pub struct TraverseOptions {
    /// Maximum depth (inclusive) explored from the origin.
    pub max_depth: u32,
    /// Direction to follow.
    pub direction: Dir,
    /// Edges eligible for expansion.
    pub edges: EdgeFilter,
}

impl TraverseOptions {
    /// Outbound traversal over `edges` up to `max_depth` hops.
    pub fn outbound(edges: EdgeFilter, max_depth: u32) -> Self {
        Self {
            max_depth,
            direction: Dir::Out,
            edges,
        }
    }
}

/// Node reached during a traversal.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Visit {
    /// Identifier of the visited node.
    pub node: DocId,
    /// Distance in hops from the origin.
    pub depth: u32,
}

/// Read-only query capability the validator runs against.
///
/// Implementations must be safe to share across worker threads and must not
/// mutate the underlying graph. Results are expected to come back in a stable
/// order so that repeated validations render identically.
pub trait GraphQuery: Send + Sync {
    /// Resolves a node by identifier.
    fn node(&self, id: &DocId) -> Result<Option<Node>>;

    /// Lists nodes matching `filter`.
    fn nodes(&self, filter: &NodeFilter) -> Result<Vec<Node>>;

    /// Lists every edge of an edge collection. Unknown collections are empty.
    fn edges(&self, collection: &str) -> Result<Vec<Edge>>;

    /// Lists the edges touching `id` in direction `dir` that pass `filter`.
    fn adjacent(&self, id: &DocId, dir: Dir, filter: &EdgeFilter) -> Result<Vec<Edge>>;

    /// Breadth-first traversal from `start` bounded by `opts.max_depth`.
    ///
    /// The origin is reported at depth 0. Other nodes are reported once, at
    /// their shortest distance. If the traversal leads back to the origin, the
    /// origin is reported a second time at the depth where that first happens
    /// and is not expanded again.
    fn traverse(&self, start: &DocId, opts: &TraverseOptions) -> Result<Vec<Visit>> {
        let mut queue: VecDeque<(DocId, u32)> = VecDeque::new();
        let mut seen: HashSet<DocId> = HashSet::new();
        let mut visits: Vec<Visit> = Vec::new();
        let mut returned = false;
        seen.insert(start.clone());
        queue.push_back((start.clone(), 0));
        while let Some((node, depth)) = queue.pop_front() {
            let is_return = depth > 0 && node == *start;
            visits.push(Visit {
                node: node.clone(),
                depth,
            });
            if is_return || depth >= opts.max_depth {
                continue;
            }
            for edge in self.adjacent(&node, opts.direction, &opts.edges)? {
                let next = edge.opposite(&node);
                if next == start {
                    if !returned {
                        returned = true;
                        queue.push_back((next.clone(), depth + 1));
                    }
                } else if seen.insert(next.clone()) {
                    queue.push_back((next.clone(), depth + 1));
                }
            }
        }
        Ok(visits)
    }
}
