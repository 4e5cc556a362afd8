//! # Reconciliation Logic
//!
//! Entry point called by the controller runtime for each `AmazonCloudWatchAgent`.
//!
//! The resource is fetched fresh by identity; a resource that no longer
//! exists is not an error. Everything else is delegated to the task pipeline.

use std::sync::Arc;
use std::time::Instant;

use kube::api::Api;
use kube::runtime::events::{Event, EventType};
use kube::{Resource, ResourceExt};
use kube_runtime::controller::Action;
use tracing::{debug, info, warn, Instrument};

use crate::controller::reconciler::error::{PipelineError, ReconcilerError};
use crate::controller::reconciler::types::Reconciler;
use crate::crd::AmazonCloudWatchAgent;
use crate::observability;

/// Reconcile function handed to the controller runtime
///
/// Errors are handled by `error_policy()`, which decides when to retry.
pub async fn reconcile(
    instance: Arc<AmazonCloudWatchAgent>,
    ctx: Arc<Reconciler>,
) -> Result<Action, ReconcilerError> {
    let namespace = instance
        .namespace()
        .ok_or(ReconcilerError::MissingNamespace)?;
    let name = instance.name_any();

    let start = Instant::now();
    observability::metrics::increment_reconciliations();
    let result = ctx.reconcile_by_name(&namespace, &name).await;
    observability::metrics::observe_reconciliation_duration(start.elapsed().as_secs_f64());
    result
}

impl Reconciler {
    /// Converge the resource `namespace/name` toward its declared state
    pub async fn reconcile_by_name(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Action, ReconcilerError> {
        let span = tracing::info_span!(
            "reconcile",
            resource.name = name,
            resource.namespace = namespace,
            resource.kind = "AmazonCloudWatchAgent"
        );

        let api: Api<AmazonCloudWatchAgent> = Api::namespaced(self.client.clone(), namespace);
        let instance = match api.get(name).instrument(span.clone()).await {
            Ok(instance) => instance,
            Err(kube::Error::Api(e)) if e.code == 404 => {
                span.in_scope(|| debug!("resource not found, nothing to reconcile"));
                return Ok(Action::await_change());
            }
            Err(source) => {
                return Err(ReconcilerError::Fetch {
                    namespace: namespace.to_string(),
                    name: name.to_string(),
                    source,
                });
            }
        };

        let params = self.params(instance, span.clone());
        match self.pipeline.run(&params).instrument(span.clone()).await {
            Ok(report) => {
                span.in_scope(|| {
                    if report.halted_by_namespace_termination {
                        info!("namespace is terminating, reconciliation stopped early");
                    } else {
                        debug!(
                            tasks = report.executed.len(),
                            ignored_failures = report.ignored.len(),
                            "reconciliation complete"
                        );
                    }
                });
                Ok(Action::await_change())
            }
            Err(err) => {
                publish_failure(&params.recorder, &params.instance, &err)
                    .instrument(span)
                    .await;
                Err(err.into())
            }
        }
    }
}

/// Record a Warning event on the resource; failures to publish are only logged
async fn publish_failure(
    recorder: &kube::runtime::events::Recorder,
    instance: &AmazonCloudWatchAgent,
    err: &PipelineError,
) {
    let event = Event {
        type_: EventType::Warning,
        reason: "FailedReconcile".to_string(),
        note: Some(err.to_string()),
        action: "Reconcile".to_string(),
        secondary: None,
    };
    if let Err(e) = recorder.publish(&event, &instance.object_ref(&())).await {
        warn!(task = %err.task(), error = %e, "failed to publish reconciliation event");
    }
}
