//! # Metrics
//!
//! Prometheus metrics for monitoring the operator.
//!
//! ## Metrics Exposed
//!
//! - `cloudwatch_agent_operator_reconciliations_total` - Total number of reconciliations
//! - `cloudwatch_agent_operator_reconciliation_errors_total` - Total number of reconciliation errors
//! - `cloudwatch_agent_operator_reconciliation_duration_seconds` - Duration of reconciliation operations
//! - `cloudwatch_agent_operator_task_failures_total` - Failed convergence steps by task and policy
//! - `cloudwatch_agent_operator_namespace_terminating_total` - Runs stopped by a terminating namespace

use anyhow::Result;
use prometheus::{Histogram, IntCounter, IntCounterVec, Registry};
use std::sync::LazyLock;

pub(crate) static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

static RECONCILIATIONS_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "cloudwatch_agent_operator_reconciliations_total",
        "Total number of reconciliations",
    )
    .expect("Failed to create RECONCILIATIONS_TOTAL metric - this should never happen")
});

static RECONCILIATION_ERRORS_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "cloudwatch_agent_operator_reconciliation_errors_total",
        "Total number of reconciliation errors",
    )
    .expect("Failed to create RECONCILIATION_ERRORS_TOTAL metric - this should never happen")
});

static RECONCILIATION_DURATION: LazyLock<Histogram> = LazyLock::new(|| {
    Histogram::with_opts(
        prometheus::HistogramOpts::new(
            "cloudwatch_agent_operator_reconciliation_duration_seconds",
            "Duration of reconciliation in seconds",
        )
        .buckets(vec![0.05, 0.1, 0.5, 1.0, 2.0, 5.0, 10.0]),
    )
    .expect("Failed to create RECONCILIATION_DURATION metric - this should never happen")
});

static TASK_FAILURES_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "cloudwatch_agent_operator_task_failures_total",
            "Total number of failed reconciliation tasks by task name and bail-on-error policy",
        ),
        &["task", "bail"],
    )
    .expect("Failed to create TASK_FAILURES_TOTAL metric - this should never happen")
});

static NAMESPACE_TERMINATING_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "cloudwatch_agent_operator_namespace_terminating_total",
        "Total number of reconciliations stopped because the namespace is being terminated",
    )
    .expect("Failed to create NAMESPACE_TERMINATING_TOTAL metric - this should never happen")
});

#[allow(
    clippy::missing_errors_doc,
    reason = "Error documentation is provided in doc comments"
)]
pub fn register_metrics() -> Result<()> {
    REGISTRY.register(Box::new(RECONCILIATIONS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(RECONCILIATION_ERRORS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(RECONCILIATION_DURATION.clone()))?;
    REGISTRY.register(Box::new(TASK_FAILURES_TOTAL.clone()))?;
    REGISTRY.register(Box::new(NAMESPACE_TERMINATING_TOTAL.clone()))?;

    Ok(())
}

pub fn increment_reconciliations() {
    RECONCILIATIONS_TOTAL.inc();
}

pub fn increment_reconciliation_errors() {
    RECONCILIATION_ERRORS_TOTAL.inc();
}

pub fn observe_reconciliation_duration(duration: f64) {
    RECONCILIATION_DURATION.observe(duration);
}

/// Increment failed task counter
pub fn increment_task_failures(task: &str, bail_on_error: bool) {
    TASK_FAILURES_TOTAL
        .with_label_values(&[task, if bail_on_error { "true" } else { "false" }])
        .inc();
}

pub fn increment_namespace_terminating() {
    NAMESPACE_TERMINATING_TOTAL.inc();
}
