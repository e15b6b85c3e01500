use crate::storage::{CollectionLayout, GraphQuery, Node};
use crate::types::Result;

use super::cancel::CancelToken;
use super::report::{Severity, Violation};
use super::rules::RuleConfig;

/// A single integrity rule.
///
/// Checks are pure functions of the graph: they read through
/// [`CheckContext::graph`] and return every violation they find. Running a
/// check against an empty graph must yield no violations.
pub trait Check: Send + Sync {
    /// Display name used as the report category.
    fn category(&self) -> &'static str;

    /// Severity of every violation in the category.
    fn severity(&self) -> Severity;

    /// Evaluates the rule.
    fn run(&self, ctx: &CheckContext<'_>) -> Result<Vec<Violation>>;
}

/// Everything a check needs to evaluate its rule.
pub struct CheckContext<'a> {
    /// Graph under validation.
    pub graph: &'a dyn GraphQuery,
    /// Collection naming.
    pub layout: &'a CollectionLayout,
    /// Rule tunables.
    pub rules: &'a RuleConfig,
    cancel: &'a CancelToken,
}

impl<'a> CheckContext<'a> {
    /// Bundles the inputs of one run.
    pub fn new(
        graph: &'a dyn GraphQuery,
        layout: &'a CollectionLayout,
        rules: &'a RuleConfig,
        cancel: &'a CancelToken,
    ) -> Self {
        Self {
            graph,
            layout,
            rules,
            cancel,
        }
    }

    /// Returns an error if the run was cancelled. Checks call this between
    /// capability calls.
    pub fn checkpoint(&self) -> Result<()> {
        self.cancel.check()
    }

    /// First `preview_chars` characters of the node's `content`.
    pub fn content_preview(&self, node: &Node) -> Option<String> {
        node.str_field("content")
            .map(|content| preview(content, self.rules.preview_chars))
    }
}

pub(crate) fn preview(content: &str, chars: usize) -> String {
    content.chars().take(chars).collect()
}
