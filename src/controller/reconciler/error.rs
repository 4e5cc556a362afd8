//! # Errors
//!
//! Error types for convergence steps, the task pipeline and the reconciler.

use thiserror::Error;

/// Failure of a single convergence step
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("Kubernetes API error: {0}")]
    Kube(#[from] kube::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Failed(String),
}

impl TaskError {
    /// Whether the API server refused the call because the namespace is being deleted
    ///
    /// Such a failure is not actionable: the namespace goes away regardless.
    #[must_use]
    pub fn is_namespace_terminating(&self) -> bool {
        match self {
            TaskError::Kube(kube::Error::Api(response)) => {
                response.code == 403
                    && (response.message.contains("because it is being terminated")
                        || response.reason == "NamespaceTerminating"
                        || response.message.contains("NamespaceTerminating"))
            }
            _ => false,
        }
    }
}

/// How the pipeline treated a failed step
#[derive(Debug)]
pub enum TaskFailure {
    /// Namespace terminating; the run stops and reports success
    NotActionable { task: String },
    /// Step marked bail-on-error; the run stops and reports this failure
    StepFailed { task: String, source: TaskError },
    /// Step not marked bail-on-error; the run continues
    StepFailedIgnored { task: String, source: TaskError },
}

impl TaskFailure {
    /// Classify a step failure under the step's policy
    #[must_use]
    pub fn classify(task: &str, bail_on_error: bool, source: TaskError) -> Self {
        let task = task.to_string();
        if source.is_namespace_terminating() {
            TaskFailure::NotActionable { task }
        } else if bail_on_error {
            TaskFailure::StepFailed { task, source }
        } else {
            TaskFailure::StepFailedIgnored { task, source }
        }
    }
}

/// Failure propagated out of a pipeline run
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to reconcile {task}: {source}")]
    StepFailed {
        task: String,
        #[source]
        source: TaskError,
    },
}

impl PipelineError {
    /// Name of the step that stopped the run
    #[must_use]
    pub fn task(&self) -> &str {
        match self {
            PipelineError::StepFailed { task, .. } => task,
        }
    }
}

/// Reconciliation error surfaced to the controller runtime
#[derive(Debug, Error)]
pub enum ReconcilerError {
    #[error("resource has no namespace")]
    MissingNamespace,

    #[error("failed to fetch {namespace}/{name}: {source}")]
    Fetch {
        namespace: String,
        name: String,
        #[source]
        source: kube::Error,
    },

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}
