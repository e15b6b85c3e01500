use serde::{Deserialize, Serialize};

use crate::storage::{CollectionLayout, STATUS_ACTIVE, STATUS_PROPOSAL};

/// Default bound on revision traversal depth.
pub const DEFAULT_MAX_REVISION_DEPTH: u32 = 10;
/// Default number of characters kept in content previews.
pub const DEFAULT_PREVIEW_CHARS: usize = 50;

/// A field that must no longer appear on nodes of a collection.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct DeprecatedField {
    /// Collection whose nodes are inspected.
    pub collection: String,
    /// Field that should have been removed.
    pub field: String,
    /// Noun used for the `<label>_id` / `<label>_title` report keys.
    pub label: String,
    /// Field reported as `<label>_title`.
    pub title_field: String,
    /// Schema version in which the field was retired.
    pub removed_in: String,
}

impl Default for DeprecatedField {
    fn default() -> Self {
        Self {
            collection: "sections".into(),
            field: "parent_doc_id".into(),
            label: "section".into(),
            title_field: "title".into(),
            removed_in: "v2.1".into(),
        }
    }
}

/// Tunables shared by the built-in checks.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct RuleConfig {
    /// Maximum number of revision hops explored from each unit.
    pub max_revision_depth: u32,
    /// `type` value marking a structural containment edge.
    pub contains_type: String,
    /// Status of live content.
    pub active_status: String,
    /// Status of drafts.
    pub proposal_status: String,
    /// Characters of `content` kept in previews.
    pub preview_chars: usize,
    /// Fields retired by the current schema version.
    pub deprecated_fields: Vec<DeprecatedField>,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            max_revision_depth: DEFAULT_MAX_REVISION_DEPTH,
            contains_type: "contains".into(),
            active_status: STATUS_ACTIVE.into(),
            proposal_status: STATUS_PROPOSAL.into(),
            preview_chars: DEFAULT_PREVIEW_CHARS,
            deprecated_fields: vec![DeprecatedField::default()],
        }
    }
}

/// Options for a validation run.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ValidateOptions {
    /// Collection naming.
    pub layout: CollectionLayout,
    /// Rule tunables.
    pub rules: RuleConfig,
    /// Run checks concurrently on the rayon pool.
    pub parallel: bool,
    /// Size of a dedicated pool for parallel runs; the global pool when unset.
    pub threads: Option<usize>,
}

impl ValidateOptions {
    /// Options with parallel execution enabled.
    pub fn parallel() -> Self {
        Self {
            parallel: true,
            ..Self::default()
        }
    }
}
