use std::collections::BTreeSet;

use crate::storage::{EdgeFilter, TraverseOptions};
use crate::types::{DocId, Result};
use crate::validate::check::{Check, CheckContext};
use crate::validate::report::{Severity, Violation, ViolationDetail};

/// Revision history is acyclic.
///
/// Every node with an outbound revision edge, whatever its collection, is
/// expanded outbound over revision edges up to `max_revision_depth` hops. A
/// node is reported when the traversal leads back to it; `cycle_length` is
/// the number of edges on the shortest such path. Cycles longer than the
/// bound go undetected.
pub struct RevisionCycleCheck;

impl Check for RevisionCycleCheck {
    fn category(&self) -> &'static str {
        "Revision Cycles"
    }

    fn severity(&self) -> Severity {
        Severity::Critical
    }

    fn run(&self, ctx: &CheckContext<'_>) -> Result<Vec<Violation>> {
        let opts = TraverseOptions::outbound(
            EdgeFilter::collection(&ctx.layout.revisions),
            ctx.rules.max_revision_depth,
        );
        let origins: BTreeSet<DocId> = ctx
            .graph
            .edges(&ctx.layout.revisions)?
            .into_iter()
            .map(|edge| edge.from)
            .collect();
        let mut violations = Vec::new();
        for origin in origins {
            ctx.checkpoint()?;
            let visits = ctx.graph.traverse(&origin, &opts)?;
            let cycle = visits
                .iter()
                .find(|visit| visit.depth > 0 && visit.node == origin);
            if let Some(visit) = cycle {
                violations.push(Violation::new(
                    ViolationDetail::RevisionCycle {
                        atom_id: origin.key().to_string(),
                        cycle_length: visit.depth,
                    },
                    "Cycle detected in revision_links",
                ));
            }
        }
        Ok(violations)
    }
}
