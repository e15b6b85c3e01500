use crate::types::Result;
use crate::validate::check::{Check, CheckContext};
use crate::validate::report::{Severity, Violation, ViolationDetail};

/// Documents reach units only through sections.
pub struct LayeringCheck;

impl Check for LayeringCheck {
    fn category(&self) -> &'static str {
        "Illegal Links"
    }

    fn severity(&self) -> Severity {
        Severity::Critical
    }

    fn run(&self, ctx: &CheckContext<'_>) -> Result<Vec<Violation>> {
        ctx.checkpoint()?;
        let layout = ctx.layout;
        let violations = ctx
            .graph
            .edges(&layout.structure)?
            .into_iter()
            .filter(|edge| {
                edge.from.in_collection(&layout.documents) && edge.to.in_collection(&layout.units)
            })
            .map(|edge| {
                Violation::new(
                    ViolationDetail::IllegalLink {
                        edge_id: edge.key().to_string(),
                        from: edge.from,
                        to: edge.to,
                    },
                    "Illegal direct link from docs to atoms - must go through sections",
                )
            })
            .collect();
        Ok(violations)
    }
}
