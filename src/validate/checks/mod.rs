//! Built-in integrity rules.

mod deprecated_fields;
mod layering;
mod orphans;
mod proposal_links;
mod revision_cycles;
mod single_parent;

pub use deprecated_fields::DeprecatedFieldCheck;
pub use layering::LayeringCheck;
pub use orphans::OrphanCheck;
pub use proposal_links::ProposalLinkCheck;
pub use revision_cycles::RevisionCycleCheck;
pub use single_parent::SingleParentCheck;

use super::check::Check;

/// The six standard checks in report order.
pub fn standard_checks() -> Vec<Box<dyn Check>> {
    vec![
        Box::new(SingleParentCheck),
        Box::new(OrphanCheck),
        Box::new(LayeringCheck),
        Box::new(RevisionCycleCheck),
        Box::new(ProposalLinkCheck),
        Box::new(DeprecatedFieldCheck),
    ]
}
