//! # Error Policy
//!
//! Decides what happens after a failed reconciliation. The reconciler never
//! retries by itself; this is where a retry gets scheduled.

use crate::controller::reconciler::{Reconciler, ReconcilerError};
use crate::crd::AmazonCloudWatchAgent;
use crate::observability;
use kube_runtime::controller::Action;
use std::sync::Arc;
use tracing::error;

/// Requeue a failed resource after the configured interval
pub fn handle_reconciliation_error(
    obj: Arc<AmazonCloudWatchAgent>,
    error: &ReconcilerError,
    ctx: Arc<Reconciler>,
) -> Action {
    let name = obj.metadata.name.as_deref().unwrap_or("unknown");
    let namespace = obj.metadata.namespace.as_deref().unwrap_or("default");
    let requeue = ctx.config.reconciliation_error_requeue_duration();

    error!(
        resource.name = name,
        resource.namespace = namespace,
        error = %error,
        requeue_secs = requeue.as_secs(),
        "Reconciliation error"
    );
    observability::metrics::increment_reconciliation_errors();

    Action::requeue(requeue)
}
