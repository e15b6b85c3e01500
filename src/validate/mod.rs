//! Graph integrity validation.
//!
//! A [`Validator`] holds an ordered list of [`Check`]s and runs them against
//! any [`GraphQuery`] implementation, aggregating their findings into a
//! [`Report`]. The graph is only read.

mod cancel;
mod check;
pub mod checks;
mod report;
mod rules;

use std::time::Instant;

use rayon::prelude::*;
use thiserror::Error;
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::storage::GraphQuery;
use crate::types::GraphError;

pub use cancel::CancelToken;
pub use check::{Check, CheckContext};
pub use report::{
    CheckResult, DeprecatedFieldDetail, FailureReport, Report, Severity, Violation,
    ViolationDetail,
};
pub use rules::{
    DeprecatedField, RuleConfig, ValidateOptions, DEFAULT_MAX_REVISION_DEPTH,
    DEFAULT_PREVIEW_CHARS,
};

/// Result alias for validation runs.
pub type Result<T> = std::result::Result<T, ValidateError>;

/// Errors that abort a validation run. No partial report is produced.
#[derive(Debug, Error)]
pub enum ValidateError {
    /// A check could not query the graph.
    #[error("check '{category}' failed: {source}")]
    Check {
        /// Category of the failing check.
        category: &'static str,
        /// Underlying capability error.
        #[source]
        source: GraphError,
    },
    /// The run was cancelled through its [`CancelToken`].
    #[error("validation cancelled")]
    Cancelled,
    /// The dedicated worker pool could not be created.
    #[error("failed to build worker pool: {0}")]
    ThreadPool(String),
}

/// Ordered registry of checks plus the options they run with.
pub struct Validator {
    checks: Vec<Box<dyn Check>>,
    options: ValidateOptions,
}

impl Validator {
    /// A validator with no checks registered.
    pub fn new(options: ValidateOptions) -> Self {
        Self {
            checks: Vec::new(),
            options,
        }
    }

    /// A validator with the six built-in checks.
    pub fn standard(options: ValidateOptions) -> Self {
        Self {
            checks: checks::standard_checks(),
            options,
        }
    }

    /// Appends a check; categories are reported in registration order.
    pub fn with_check(mut self, check: impl Check + 'static) -> Self {
        self.push(Box::new(check));
        self
    }

    /// Appends a boxed check.
    pub fn push(&mut self, check: Box<dyn Check>) {
        self.checks.push(check);
    }

    /// Registered checks in order.
    pub fn checks(&self) -> &[Box<dyn Check>] {
        &self.checks
    }

    /// Options the checks run with.
    pub fn options(&self) -> &ValidateOptions {
        &self.options
    }

    /// Runs every check and aggregates the results.
    pub fn run(&self, graph: &dyn GraphQuery, cancel: &CancelToken) -> Result<Report> {
        if cancel.is_cancelled() {
            return Err(ValidateError::Cancelled);
        }
        let started = Instant::now();
        let ctx = CheckContext::new(graph, &self.options.layout, &self.options.rules, cancel);
        let outcomes = if self.options.parallel {
            match self.options.threads {
                Some(threads) => {
                    let pool = rayon::ThreadPoolBuilder::new()
                        .num_threads(threads)
                        .build()
                        .map_err(|err| ValidateError::ThreadPool(err.to_string()))?;
                    pool.install(|| self.run_parallel(&ctx))
                }
                None => self.run_parallel(&ctx),
            }
        } else {
            // Stops at the first failure; later checks never start.
            self.checks
                .iter()
                .map(|check| run_check(check.as_ref(), &ctx))
                .collect::<Result<Vec<_>>>()
        };

        let issues: Vec<CheckResult> = outcomes?.into_iter().flatten().collect();
        let report = Report::new(issues, OffsetDateTime::now_utc());
        info!(
            ok = report.ok,
            total_issues = report.total_issues,
            categories = report.categories_with_issues,
            checks = self.checks.len(),
            parallel = self.options.parallel,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "validate.completed"
        );
        Ok(report)
    }

    fn run_parallel(&self, ctx: &CheckContext<'_>) -> Result<Vec<Option<CheckResult>>> {
        self.checks
            .par_iter()
            .map(|check| run_check(check.as_ref(), ctx))
            .collect()
    }
}

fn run_check(check: &dyn Check, ctx: &CheckContext<'_>) -> Result<Option<CheckResult>> {
    let started = Instant::now();
    let items = check.run(ctx).map_err(|err| match err {
        GraphError::Cancelled => ValidateError::Cancelled,
        source => ValidateError::Check {
            category: check.category(),
            source,
        },
    })?;
    debug!(
        category = check.category(),
        violations = items.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "validate.check.completed"
    );
    Ok(CheckResult::from_items(
        check.category(),
        check.severity(),
        items,
    ))
}

/// Runs the standard checks against `graph`.
pub fn validate(graph: &dyn GraphQuery, options: &ValidateOptions) -> Result<Report> {
    validate_with_cancel(graph, options, &CancelToken::new())
}

/// Runs the standard checks, stopping early once `cancel` is triggered.
pub fn validate_with_cancel(
    graph: &dyn GraphQuery,
    options: &ValidateOptions,
    cancel: &CancelToken,
) -> Result<Report> {
    Validator::standard(options.clone()).run(graph, cancel)
}
