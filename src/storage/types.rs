use serde::Serialize;
use serde_json::{Map, Value};

use crate::types::{DocId, GraphError, Result};

/// Status carried by canonical, live content.
pub const STATUS_ACTIVE: &str = "active";
/// Status carried by drafts awaiting approval.
pub const STATUS_PROPOSAL: &str = "proposal";

/// Document field holding the node status.
pub const FIELD_STATUS: &str = "status";
/// Document field holding the edge discriminator.
pub const FIELD_TYPE: &str = "type";

/// A content unit in the graph.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Node {
    /// Namespaced identifier.
    pub id: DocId,
    /// Remaining document fields (`status`, `content`, `title`, ...).
    pub fields: Map<String, Value>,
}

impl Node {
    /// Creates a node with no fields.
    pub fn new(id: DocId) -> Self {
        Self {
            id,
            fields: Map::new(),
        }
    }

    /// Sets the `status` field.
    pub fn with_status(self, status: &str) -> Self {
        self.with_field(FIELD_STATUS, status)
    }

    /// Sets an arbitrary field.
    pub fn with_field(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(name.to_string(), value.into());
        self
    }

    /// Key half of the identifier.
    pub fn key(&self) -> &str {
        self.id.key()
    }

    /// Status string, if the node has one.
    pub fn status(&self) -> Option<&str> {
        self.str_field(FIELD_STATUS)
    }

    /// Raw field value.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Field value when it is a string.
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }

    /// Builds a node from an exported document belonging to `collection`.
    pub fn from_document(collection: &str, doc: Map<String, Value>) -> Result<Self> {
        let (id, fields) = split_identity(collection, doc)?;
        Ok(Self { id, fields })
    }
}

/// A typed, directed relationship between two nodes.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Edge {
    /// Namespaced identifier; the collection names the relation kind.
    pub id: DocId,
    /// Source node.
    pub from: DocId,
    /// Target node.
    pub to: DocId,
    /// Optional `type` discriminator (for example `contains`).
    pub edge_type: Option<String>,
    /// Remaining document fields.
    pub fields: Map<String, Value>,
}

impl Edge {
    /// Creates an untyped edge.
    pub fn new(id: DocId, from: DocId, to: DocId) -> Self {
        Self {
            id,
            from,
            to,
            edge_type: None,
            fields: Map::new(),
        }
    }

    /// Sets the `type` discriminator.
    pub fn with_type(mut self, edge_type: &str) -> Self {
        self.edge_type = Some(edge_type.to_string());
        self
    }

    /// Key half of the identifier.
    pub fn key(&self) -> &str {
        self.id.key()
    }

    /// Endpoint opposite to `node`. Self-loops return `node` itself.
    pub fn opposite(&self, node: &DocId) -> &DocId {
        if self.from == *node {
            &self.to
        } else {
            &self.from
        }
    }

    /// Builds an edge from an exported document belonging to `collection`.
    pub fn from_document(collection: &str, doc: Map<String, Value>) -> Result<Self> {
        let (id, mut fields) = split_identity(collection, doc)?;
        let from = take_ref(&id, &mut fields, "_from")?;
        let to = take_ref(&id, &mut fields, "_to")?;
        let edge_type = match fields.remove(FIELD_TYPE) {
            None | Some(Value::Null) => None,
            Some(Value::String(ty)) => Some(ty),
            Some(other) => {
                return Err(GraphError::Malformed(format!(
                    "edge {id} has non-string type {other}"
                )))
            }
        };
        Ok(Self {
            id,
            from,
            to,
            edge_type,
            fields,
        })
    }
}

/// Returns true when `doc` looks like an edge document.
pub(crate) fn is_edge_document(doc: &Map<String, Value>) -> bool {
    doc.contains_key("_from") && doc.contains_key("_to")
}

fn split_identity(
    collection: &str,
    mut doc: Map<String, Value>,
) -> Result<(DocId, Map<String, Value>)> {
    let key = doc.remove("_key");
    let raw_id = doc.remove("_id");
    doc.remove("_rev");
    let id = match (raw_id, key) {
        (Some(Value::String(raw)), _) => {
            let id = DocId::parse(&raw)?;
            if !id.in_collection(collection) {
                return Err(GraphError::InvalidId(format!(
                    "{raw} does not belong to collection {collection}"
                )));
            }
            id
        }
        (_, Some(Value::String(key))) if !key.is_empty() => DocId::new(collection, key),
        (_, Some(Value::Number(key))) => DocId::new(collection, key.to_string()),
        _ => {
            return Err(GraphError::Malformed(format!(
                "document in {collection} has neither _id nor _key"
            )))
        }
    };
    Ok((id, doc))
}

fn take_ref(owner: &DocId, fields: &mut Map<String, Value>, name: &str) -> Result<DocId> {
    match fields.remove(name) {
        Some(Value::String(raw)) => DocId::parse(&raw),
        _ => Err(GraphError::Malformed(format!(
            "edge {owner} is missing a string {name}"
        ))),
    }
}
