use serde_json::Value;

use crate::storage::NodeFilter;
use crate::types::Result;
use crate::validate::check::{Check, CheckContext};
use crate::validate::report::{DeprecatedFieldDetail, Severity, Violation, ViolationDetail};

/// Fields retired by the schema version are gone.
///
/// Each configured [`DeprecatedField`](crate::validate::DeprecatedField) is
/// checked in turn; a field set to `null` counts as removed.
pub struct DeprecatedFieldCheck;

impl Check for DeprecatedFieldCheck {
    fn category(&self) -> &'static str {
        "Schema v2.1 Compliance"
    }

    fn severity(&self) -> Severity {
        Severity::Warning
    }

    fn run(&self, ctx: &CheckContext<'_>) -> Result<Vec<Violation>> {
        let mut violations = Vec::new();
        for rule in &ctx.rules.deprecated_fields {
            ctx.checkpoint()?;
            for node in ctx.graph.nodes(&NodeFilter::in_collection(&rule.collection))? {
                let value = match node.field(&rule.field) {
                    None | Some(Value::Null) => continue,
                    Some(value) => value.clone(),
                };
                violations.push(Violation::new(
                    ViolationDetail::DeprecatedField(DeprecatedFieldDetail {
                        label: rule.label.clone(),
                        node_key: node.key().to_string(),
                        title: node.field(&rule.title_field).cloned().unwrap_or(Value::Null),
                        field: rule.field.clone(),
                        value,
                    }),
                    format!(
                        "{} field found - should be removed in {}",
                        rule.field, rule.removed_in
                    ),
                ));
            }
        }
        Ok(violations)
    }
}
