//! # Types
//!
//! Per-reconciliation parameters and the shared reconciler context.

use std::fmt;
use std::sync::Arc;

use k8s_openapi::NamespaceResourceScope;
use kube::runtime::events::{Recorder, Reporter};
use kube::{Api, Client, Resource, ResourceExt};

use crate::config::ControllerConfig;
use crate::constants::FIELD_MANAGER;
use crate::controller::reconciler::pipeline::{Task, TaskPipeline};
use crate::controller::reconciler::steps;
use crate::crd::AmazonCloudWatchAgent;

/// Everything one reconciliation needs
///
/// Built fresh for every pass and owned by that pass's pipeline run.
pub struct Params {
    pub config: Arc<ControllerConfig>,
    pub client: Client,
    /// Snapshot of the resource fetched at the start of the pass
    pub instance: AmazonCloudWatchAgent,
    pub recorder: Recorder,
    /// Span carrying the resource identity
    pub span: tracing::Span,
}

impl fmt::Debug for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Params")
            .field("config", &self.config)
            .field("instance", &self.instance.name_any())
            .finish_non_exhaustive()
    }
}

impl Params {
    /// Namespace of the instance; every owned object lives there
    #[must_use]
    pub fn namespace(&self) -> String {
        self.instance.namespace().unwrap_or_default()
    }

    /// Namespaced API for an owned object kind
    #[must_use]
    pub fn api<K>(&self) -> Api<K>
    where
        K: Resource<Scope = NamespaceResourceScope>,
        K::DynamicType: Default,
    {
        Api::namespaced(self.client.clone(), &self.namespace())
    }
}

/// Shared reconciler context handed to the controller runtime
pub struct Reconciler {
    pub client: Client,
    pub config: Arc<ControllerConfig>,
    pub reporter: Reporter,
    pub pipeline: TaskPipeline<Params>,
}

impl fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reconciler")
            .field("config", &self.config)
            .field("reporter", &self.reporter)
            .finish_non_exhaustive()
    }
}

impl Reconciler {
    /// Reconciler running the default convergence steps
    #[must_use]
    pub fn new(client: Client, config: Arc<ControllerConfig>) -> Self {
        Self::with_tasks(client, config, Vec::new())
    }

    /// Reconciler running `tasks`, or the default steps when `tasks` is empty
    #[must_use]
    pub fn with_tasks(client: Client, config: Arc<ControllerConfig>, tasks: Vec<Task<Params>>) -> Self {
        let tasks = if tasks.is_empty() {
            steps::default_tasks()
        } else {
            tasks
        };
        Self {
            client,
            config,
            reporter: Reporter {
                controller: FIELD_MANAGER.to_string(),
                instance: None,
            },
            pipeline: TaskPipeline::new(tasks),
        }
    }

    /// Parameters for one pass over `instance`
    #[must_use]
    pub fn params(&self, instance: AmazonCloudWatchAgent, span: tracing::Span) -> Params {
        Params {
            config: Arc::clone(&self.config),
            client: self.client.clone(),
            recorder: Recorder::new(self.client.clone(), self.reporter.clone()),
            instance,
            span,
        }
    }
}
