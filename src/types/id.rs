use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{GraphError, Result};

/// Namespaced document identifier in `collection/key` form.
///
/// Both halves are non-empty; the key may itself contain `/` characters, only
/// the first separator splits the collection from the key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocId {
    collection: String,
    key: String,
}

impl DocId {
    /// Builds an identifier from its two halves.
    pub fn new(collection: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            key: key.into(),
        }
    }

    /// Parses a `collection/key` string.
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.split_once('/') {
            Some((collection, key)) if !collection.is_empty() && !key.is_empty() => {
                Ok(Self::new(collection, key))
            }
            _ => Err(GraphError::InvalidId(raw.to_string())),
        }
    }

    /// Collection half of the identifier.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Key half of the identifier.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns true when the identifier lives in `collection`.
    pub fn in_collection(&self, collection: &str) -> bool {
        self.collection == collection
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.key)
    }
}

impl FromStr for DocId {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for DocId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DocId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DocId::parse(&raw).map_err(serde::de::Error::custom)
    }
}
