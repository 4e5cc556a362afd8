//! # Status
//!
//! Final step: reports the agent version, ready pods and a `Ready` condition
//! on the resource itself.
//!
//! The status carries no per-pass timestamps. A condition keeps its
//! transition time until its status actually changes, so a pass that changes
//! nothing computes an identical status and skips the write. Writing anyway
//! would trigger another watch event and another pass.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use k8s_openapi::api::apps::v1::{DaemonSet, Deployment};
use kube::api::{Patch, PatchParams};
use kube::ResourceExt;
use serde_json::json;
use tracing::debug;

use crate::config::ControllerConfig;
use crate::controller::manifests::{container, labels, naming};
use crate::controller::reconciler::error::TaskError;
use crate::controller::reconciler::pipeline::TaskAction;
use crate::controller::reconciler::types::Params;
use crate::crd::{AgentMode, AmazonCloudWatchAgent, AmazonCloudWatchAgentStatus, Condition};

const READY_CONDITION: &str = "Ready";

/// Pod counts observed on the owning workload
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkloadReadiness {
    pub ready: i32,
    pub desired: i32,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SelfStatus;

#[async_trait]
impl TaskAction<Params> for SelfStatus {
    async fn run(&self, params: &Params) -> Result<(), TaskError> {
        let readiness = observe_workload(params).await?;
        let status = desired_status(&params.config, &params.instance, readiness, Utc::now());

        if params.instance.status.as_ref() == Some(&status) {
            debug!("status unchanged, skipping update");
            return Ok(());
        }

        let body = json!({ "status": serde_json::to_value(&status)? });
        params
            .api::<AmazonCloudWatchAgent>()
            .patch_status(
                &params.instance.name_any(),
                &PatchParams::default(),
                &Patch::Merge(&body),
            )
            .await?;
        debug!(ready = ?status.replicas, "status updated");
        Ok(())
    }
}

async fn observe_workload(params: &Params) -> Result<Option<WorkloadReadiness>, TaskError> {
    let name = naming::workload(&params.instance.name_any());
    let readiness = match params.instance.spec.mode {
        AgentMode::Deployment => params
            .api::<Deployment>()
            .get_opt(&name)
            .await?
            .map(|d| WorkloadReadiness {
                ready: d
                    .status
                    .as_ref()
                    .and_then(|s| s.ready_replicas)
                    .unwrap_or(0),
                desired: d.spec.as_ref().and_then(|s| s.replicas).unwrap_or(1),
            }),
        AgentMode::DaemonSet => params
            .api::<DaemonSet>()
            .get_opt(&name)
            .await?
            .map(|d| {
                let status = d.status.unwrap_or_default();
                WorkloadReadiness {
                    ready: status.number_ready,
                    desired: status.desired_number_scheduled,
                }
            }),
    };
    Ok(readiness)
}

/// Status for `instance` given the observed workload
///
/// `now` is only used when the `Ready` condition changes.
#[must_use]
pub fn desired_status(
    config: &ControllerConfig,
    instance: &AmazonCloudWatchAgent,
    readiness: Option<WorkloadReadiness>,
    now: DateTime<Utc>,
) -> AmazonCloudWatchAgentStatus {
    let previous = instance
        .status
        .as_ref()
        .and_then(|s| s.conditions.iter().find(|c| c.r#type == READY_CONDITION));

    let (ready, reason, message) = match readiness {
        None => (false, "WorkloadMissing", "agent workload has not been created yet".to_string()),
        Some(r) if r.ready >= r.desired => (
            true,
            "AgentReady",
            format!("{}/{} agent pods ready", r.ready, r.desired),
        ),
        Some(r) => (
            false,
            "AgentNotReady",
            format!("{}/{} agent pods ready", r.ready, r.desired),
        ),
    };
    let status = if ready { "True" } else { "False" };

    let last_transition_time = match previous {
        Some(p) if p.status == status => p.last_transition_time.clone(),
        _ => Some(now.to_rfc3339()),
    };

    AmazonCloudWatchAgentStatus {
        version: Some(labels::image_tag(container::agent_image(config, &instance.spec)).to_string()),
        replicas: Some(readiness.map_or(0, |r| r.ready)),
        observed_generation: instance.metadata.generation,
        conditions: vec![Condition {
            r#type: READY_CONDITION.to_string(),
            status: status.to_string(),
            last_transition_time,
            reason: Some(reason.to_string()),
            message: Some(message),
        }],
    }
}
