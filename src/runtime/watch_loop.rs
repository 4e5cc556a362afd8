//! # Watch Loop
//!
//! Watches `AmazonCloudWatchAgent` resources and the objects they own, and
//! triggers reconciliation when either changes.

use crate::config::SharedControllerConfig;
use crate::controller::reconciler::{reconcile, Reconciler};
use crate::controller::server::ServerState;
use crate::crd::AmazonCloudWatchAgent;
use crate::runtime::error_policy::handle_reconciliation_error;
use futures::StreamExt;
use k8s_openapi::api::apps::v1::{DaemonSet, Deployment};
use k8s_openapi::api::core::v1::{ConfigMap, Service, ServiceAccount};
use kube::api::Api;
use kube::Client;
use kube_runtime::{controller, watcher, Controller};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Run the controller until a shutdown signal arrives
///
/// Reconciliations of different resources run concurrently up to the
/// configured limit; the runtime never runs two for the same resource at once.
pub async fn run_watch_loop(
    client: Client,
    agents: Api<AmazonCloudWatchAgent>,
    reconciler: Arc<Reconciler>,
    server_state: Arc<ServerState>,
    controller_config: SharedControllerConfig,
) -> Result<(), anyhow::Error> {
    let concurrency = controller_config.read().await.max_concurrent_reconciliations;

    info!(concurrency, "Starting controller watch loop...");
    server_state.is_ready.store(true, Ordering::Relaxed);

    let owned = watcher::Config::default();
    Controller::new(agents, watcher::Config::default().any_semantic())
        .owns(Api::<ConfigMap>::all(client.clone()), owned.clone())
        .owns(Api::<ServiceAccount>::all(client.clone()), owned.clone())
        .owns(Api::<Service>::all(client.clone()), owned.clone())
        .owns(Api::<Deployment>::all(client.clone()), owned.clone())
        .owns(Api::<DaemonSet>::all(client), owned)
        .with_config(controller::Config::default().concurrency(concurrency))
        .shutdown_on_signal()
        .run(reconcile, handle_reconciliation_error, reconciler)
        .for_each(|result| async move {
            match result {
                Ok((obj, _)) => debug!(
                    resource.name = %obj.name,
                    resource.namespace = ?obj.namespace,
                    "reconciled"
                ),
                Err(e) => warn!(error = %e, "controller stream error"),
            }
        })
        .await;

    server_state.is_ready.store(false, Ordering::Relaxed);
    info!("Controller stopped gracefully");
    Ok(())
}
