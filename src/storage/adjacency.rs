use super::types::Edge;

/// Direction to follow when expanding a node's edges.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Dir {
    /// Edges whose `_from` is the node.
    Out,
    /// Edges whose `_to` is the node.
    In,
    /// Both of the above.
    Both,
}

impl Dir {
    /// Whether outbound edges are included.
    pub fn includes_out(self) -> bool {
        matches!(self, Dir::Out | Dir::Both)
    }

    /// Whether inbound edges are included.
    pub fn includes_in(self) -> bool {
        matches!(self, Dir::In | Dir::Both)
    }
}

/// Selects edges of one collection, optionally narrowed to a `type`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EdgeFilter {
    /// Edge collection to read from.
    pub collection: String,
    /// Required `type` discriminator, or any type when `None`.
    pub edge_type: Option<String>,
}

impl EdgeFilter {
    /// Matches every edge in `collection`.
    pub fn collection(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            edge_type: None,
        }
    }

    /// Narrows the filter to edges carrying `edge_type`.
    pub fn of_type(mut self, edge_type: impl Into<String>) -> Self {
        self.edge_type = Some(edge_type.into());
        self
    }

    /// Returns true when `edge` passes the filter.
    pub fn matches(&self, edge: &Edge) -> bool {
        if !edge.id.in_collection(&self.collection) {
            return false;
        }
        match &self.edge_type {
            Some(required) => edge.edge_type.as_deref() == Some(required.as_str()),
            None => true,
        }
    }
}
