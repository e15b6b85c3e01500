use crate::storage::Node;
use crate::types::Result;
use crate::validate::check::{Check, CheckContext};
use crate::validate::report::{Severity, Violation, ViolationDetail};

const INVALID_ENDPOINTS: &str =
    "Invalid proposal_link - source must be 'proposal', target must be 'active'";

/// Proposal edges run from a `proposal` unit to an `active` unit.
///
/// Endpoints that do not resolve are reported too, with a `null` status on
/// the missing side.
pub struct ProposalLinkCheck;

impl Check for ProposalLinkCheck {
    fn category(&self) -> &'static str {
        "Proposal Links"
    }

    fn severity(&self) -> Severity {
        Severity::Warning
    }

    fn run(&self, ctx: &CheckContext<'_>) -> Result<Vec<Violation>> {
        let rules = ctx.rules;
        let mut violations = Vec::new();
        for edge in ctx.graph.edges(&ctx.layout.proposals)? {
            ctx.checkpoint()?;
            let source = ctx.graph.node(&edge.from)?;
            let target = ctx.graph.node(&edge.to)?;
            let from_status = status_of(source.as_ref());
            let to_status = status_of(target.as_ref());
            let issue = match (&source, &target) {
                (None, None) => "Dangling proposal_link - source and target do not exist",
                (None, Some(_)) => "Dangling proposal_link - source does not exist",
                (Some(_), None) => "Dangling proposal_link - target does not exist",
                (Some(_), Some(_)) => {
                    let valid = from_status.as_deref() == Some(rules.proposal_status.as_str())
                        && to_status.as_deref() == Some(rules.active_status.as_str());
                    if valid {
                        continue;
                    }
                    INVALID_ENDPOINTS
                }
            };
            violations.push(Violation::new(
                ViolationDetail::ProposalLink {
                    edge_id: edge.key().to_string(),
                    from: edge.from,
                    from_status,
                    to: edge.to,
                    to_status,
                },
                issue,
            ));
        }
        Ok(violations)
    }
}

fn status_of(node: Option<&Node>) -> Option<String> {
    node.and_then(Node::status).map(str::to_string)
}
