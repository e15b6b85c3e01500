use std::collections::BTreeMap;

use crate::storage::EdgeFilter;
use crate::types::{DocId, Result};
use crate::validate::check::{Check, CheckContext};
use crate::validate::report::{Severity, Violation, ViolationDetail};

/// Every node under the structure tree has at most one inbound `contains`
/// edge.
///
/// Children are grouped by edge target, so sections are held to the rule as
/// well as units. A target without a node record still counts; its preview
/// is empty.
pub struct SingleParentCheck;

impl Check for SingleParentCheck {
    fn category(&self) -> &'static str {
        "Single Parent Invariant"
    }

    fn severity(&self) -> Severity {
        Severity::Critical
    }

    fn run(&self, ctx: &CheckContext<'_>) -> Result<Vec<Violation>> {
        ctx.checkpoint()?;
        let filter = EdgeFilter::collection(&ctx.layout.structure).of_type(&ctx.rules.contains_type);
        let mut parents: BTreeMap<DocId, usize> = BTreeMap::new();
        for edge in ctx.graph.edges(&filter.collection)? {
            if filter.matches(&edge) {
                *parents.entry(edge.to).or_default() += 1;
            }
        }
        let mut violations = Vec::new();
        for (child, parents_count) in parents {
            if parents_count < 2 {
                continue;
            }
            ctx.checkpoint()?;
            let atom_content_preview = ctx
                .graph
                .node(&child)?
                .and_then(|node| ctx.content_preview(&node));
            violations.push(Violation::new(
                ViolationDetail::MultipleParents {
                    atom_id: child.key().to_string(),
                    atom_content_preview,
                    parents_count,
                },
                "Multiple parents detected - violates Single Parent Invariant",
            ));
        }
        Ok(violations)
    }
}
