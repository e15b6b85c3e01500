use crate::storage::{Dir, EdgeFilter, NodeFilter};
use crate::types::Result;
use crate::validate::check::{Check, CheckContext};
use crate::validate::report::{Severity, Violation, ViolationDetail};

/// Active units hang somewhere in the structure tree.
///
/// Any inbound structural edge counts as a parent, whatever its `type`.
/// Proposals and archived units are exempt.
pub struct OrphanCheck;

impl Check for OrphanCheck {
    fn category(&self) -> &'static str {
        "Orphaned Nodes"
    }

    fn severity(&self) -> Severity {
        Severity::Warning
    }

    fn run(&self, ctx: &CheckContext<'_>) -> Result<Vec<Violation>> {
        let structure = EdgeFilter::collection(&ctx.layout.structure);
        let active = NodeFilter::in_collection(&ctx.layout.units).with_status(&ctx.rules.active_status);
        let mut violations = Vec::new();
        for atom in ctx.graph.nodes(&active)? {
            ctx.checkpoint()?;
            if ctx.graph.adjacent(&atom.id, Dir::In, &structure)?.is_empty() {
                violations.push(Violation::new(
                    ViolationDetail::Orphan {
                        atom_id: atom.key().to_string(),
                        atom_content_preview: ctx.content_preview(&atom),
                        status: atom.status().map(str::to_string),
                    },
                    "Orphaned active atom - no incoming structure links",
                ));
            }
        }
        Ok(violations)
    }
}
