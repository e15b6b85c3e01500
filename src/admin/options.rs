use serde::{Deserialize, Serialize};

use crate::storage::CollectionLayout;

/// Common options used when opening a snapshot for administrative commands.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct AdminOpenOptions {
    /// Collection naming used to classify empty collections.
    pub layout: CollectionLayout,
    /// Treat a missing snapshot as an empty graph instead of failing.
    pub empty_if_missing: bool,
}
