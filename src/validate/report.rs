use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use time::OffsetDateTime;

use crate::types::DocId;

/// How serious a category of violations is.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Structural corruption of the graph.
    Critical,
    /// Data that should be cleaned up but does not break structure.
    Warning,
}

impl Severity {
    /// Lowercase name as it appears in reports.
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::Warning => "warning",
        }
    }
}

/// A single detected breach of an invariant.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Violation {
    /// Check-specific identifiers and diagnostics.
    #[serde(flatten)]
    pub detail: ViolationDetail,
    /// Human-readable description.
    pub issue: String,
}

impl Violation {
    /// Pairs a detail record with its issue text.
    pub fn new(detail: ViolationDetail, issue: impl Into<String>) -> Self {
        Self {
            detail,
            issue: issue.into(),
        }
    }

    /// Identifiers of the nodes and edges involved.
    pub fn subjects(&self) -> Vec<String> {
        match &self.detail {
            ViolationDetail::MultipleParents { atom_id, .. }
            | ViolationDetail::Orphan { atom_id, .. }
            | ViolationDetail::RevisionCycle { atom_id, .. } => vec![atom_id.clone()],
            ViolationDetail::IllegalLink { edge_id, from, to }
            | ViolationDetail::ProposalLink {
                edge_id, from, to, ..
            } => vec![edge_id.clone(), from.to_string(), to.to_string()],
            ViolationDetail::DeprecatedField(field) => vec![field.node_key.clone()],
        }
    }
}

/// Diagnostic payload of a [`Violation`]; field names are part of the report format.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ViolationDetail {
    /// A node with more than one `contains` parent.
    MultipleParents {
        /// Key of the node.
        atom_id: String,
        /// First characters of the node's content.
        atom_content_preview: Option<String>,
        /// Number of inbound `contains` edges.
        parents_count: usize,
    },
    /// An active unit with no structural parent.
    Orphan {
        /// Key of the unit.
        atom_id: String,
        /// First characters of the unit's content.
        atom_content_preview: Option<String>,
        /// Status of the unit.
        status: Option<String>,
    },
    /// A structural edge skipping the section layer.
    IllegalLink {
        /// Key of the edge.
        edge_id: String,
        /// Source document.
        from: DocId,
        /// Target unit.
        to: DocId,
    },
    /// A node reachable from itself through revision edges.
    RevisionCycle {
        /// Key of the node.
        atom_id: String,
        /// Number of edges on the shortest path back to the node.
        ///
        /// This is a length, not a count of the distinct returning paths: a
        /// node sitting on two cycles reports the shorter one.
        cycle_length: u32,
    },
    /// A proposal edge with wrong or missing endpoints.
    ProposalLink {
        /// Key of the edge.
        edge_id: String,
        /// Source node.
        from: DocId,
        /// Status of the source node, `None` when it does not resolve.
        from_status: Option<String>,
        /// Target node.
        to: DocId,
        /// Status of the target node, `None` when it does not resolve.
        to_status: Option<String>,
    },
    /// A legacy field still present after migration.
    DeprecatedField(DeprecatedFieldDetail),
}

/// Payload for a deprecated-field hit.
///
/// Serialized as `<label>_id`, `<label>_title` and `<field>` so that the
/// default configuration renders `section_id`, `section_title` and
/// `parent_doc_id`.
#[derive(Clone, Debug, PartialEq)]
pub struct DeprecatedFieldDetail {
    /// Noun used to prefix the identifier and title keys.
    pub label: String,
    /// Key of the offending node.
    pub node_key: String,
    /// Title of the offending node, `Null` when absent.
    pub title: Value,
    /// Name of the deprecated field.
    pub field: String,
    /// Value still stored in the field.
    pub value: Value,
}

impl Serialize for DeprecatedFieldDetail {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry(&format!("{}_id", self.label), &self.node_key)?;
        map.serialize_entry(&format!("{}_title", self.label), &self.title)?;
        map.serialize_entry(&self.field, &self.value)?;
        map.end()
    }
}

/// Violations of one category.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CheckResult {
    /// Display name of the check.
    pub category: String,
    /// Number of violations; always equals `items.len()`.
    pub count: usize,
    /// Severity assigned to the whole category.
    pub severity: Severity,
    /// The violations themselves.
    pub items: Vec<Violation>,
}

impl CheckResult {
    /// Wraps the violations of one check; returns `None` when there are none.
    pub fn from_items(
        category: impl Into<String>,
        severity: Severity,
        items: Vec<Violation>,
    ) -> Option<Self> {
        if items.is_empty() {
            return None;
        }
        Some(Self {
            category: category.into(),
            count: items.len(),
            severity,
            items,
        })
    }
}

/// Aggregate output of one validation run.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// True iff no category produced violations.
    pub ok: bool,
    /// When the run finished.
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    /// Sum of `count` over all categories.
    pub total_issues: usize,
    /// Number of categories with at least one violation.
    pub categories_with_issues: usize,
    /// Per-category results in registration order.
    pub issues: Vec<CheckResult>,
}

impl Report {
    /// Aggregates per-category results.
    pub fn new(issues: Vec<CheckResult>, timestamp: OffsetDateTime) -> Self {
        let total_issues = issues.iter().map(|result| result.count).sum();
        Self {
            ok: issues.is_empty(),
            timestamp,
            total_issues,
            categories_with_issues: issues.len(),
            issues,
        }
    }

    /// Looks up the result for `category`.
    pub fn category(&self, category: &str) -> Option<&CheckResult> {
        self.issues.iter().find(|result| result.category == category)
    }

    /// Iterates every violation with its category and severity.
    pub fn violations(&self) -> impl Iterator<Item = (&str, Severity, &Violation)> + '_ {
        self.issues.iter().flat_map(|result| {
            result
                .items
                .iter()
                .map(move |item| (result.category.as_str(), result.severity, item))
        })
    }
}

/// Envelope emitted instead of a [`Report`] when validation fails.
#[derive(Clone, Debug, Serialize)]
pub struct FailureReport {
    /// Always false.
    pub ok: bool,
    /// Error message.
    pub error: String,
    /// When the failure was observed.
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

impl FailureReport {
    /// Captures `error` with the current time.
    pub fn now(error: impl ToString) -> Self {
        Self {
            ok: false,
            error: error.to_string(),
            timestamp: OffsetDateTime::now_utc(),
        }
    }
}
