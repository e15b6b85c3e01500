use serde::{Deserialize, Serialize};

/// Maps node kinds and relation kinds onto collection names.
///
/// Defaults follow the v2.1 requirements schema.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct CollectionLayout {
    /// Collection holding top-level documents.
    pub documents: String,
    /// Collection holding sections.
    pub sections: String,
    /// Collection holding atomic content units.
    pub units: String,
    /// Edge collection encoding parent/child containment.
    pub structure: String,
    /// Edge collection encoding version history.
    pub revisions: String,
    /// Edge collection linking drafts to canonical units.
    pub proposals: String,
}

impl Default for CollectionLayout {
    fn default() -> Self {
        Self {
            documents: "docs".into(),
            sections: "sections".into(),
            units: "atoms".into(),
            structure: "structure_links".into(),
            revisions: "revision_links".into(),
            proposals: "proposal_links".into(),
        }
    }
}

impl CollectionLayout {
    /// Names of the three edge collections.
    pub fn edge_collections(&self) -> [&str; 3] {
        [&self.structure, &self.revisions, &self.proposals]
    }

    /// Returns true when `name` is one of the layout's edge collections.
    pub fn is_edge_collection(&self, name: &str) -> bool {
        self.edge_collections().contains(&name)
    }
}
