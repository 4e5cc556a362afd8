//! # Task Pipeline
//!
//! Ordered convergence steps with a per-step failure policy.
//!
//! Steps run strictly one after another. A failed step is classified:
//!
//! - namespace terminating: the run stops and reports success
//! - bail-on-error: the run stops and the failure is returned
//! - otherwise: the failure is logged and the next step runs
//!
//! The task list is shared by every concurrent reconciliation. Runs hold a
//! read guard for their whole duration; `replace_tasks` waits for a write
//! guard, so a run never sees a half-replaced list.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use crate::controller::reconciler::error::{PipelineError, TaskError, TaskFailure};
use crate::observability;

/// The work done by one step
#[async_trait]
pub trait TaskAction<P>: Send + Sync {
    async fn run(&self, params: &P) -> Result<(), TaskError>;
}

/// A named step and its failure policy
pub struct Task<P> {
    pub name: String,
    pub bail_on_error: bool,
    pub action: Arc<dyn TaskAction<P>>,
}

impl<P> Task<P> {
    pub fn new(
        name: impl Into<String>,
        bail_on_error: bool,
        action: impl TaskAction<P> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            bail_on_error,
            action: Arc::new(action),
        }
    }
}

impl<P> Clone for Task<P> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            bail_on_error: self.bail_on_error,
            action: Arc::clone(&self.action),
        }
    }
}

impl<P> fmt::Debug for Task<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("name", &self.name)
            .field("bail_on_error", &self.bail_on_error)
            .finish_non_exhaustive()
    }
}

/// A step failure the run continued past
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoredFailure {
    pub task: String,
    pub message: String,
}

/// Outcome of a successful run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineReport {
    /// Steps that were started, in order
    pub executed: Vec<String>,
    /// Failures of steps without bail-on-error
    pub ignored: Vec<IgnoredFailure>,
    /// The run stopped early because the namespace is being deleted
    pub halted_by_namespace_termination: bool,
}

pub struct TaskPipeline<P> {
    tasks: RwLock<Vec<Task<P>>>,
}

impl<P> fmt::Debug for TaskPipeline<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskPipeline").finish_non_exhaustive()
    }
}

impl<P: Sync> TaskPipeline<P> {
    #[must_use]
    pub fn new(tasks: Vec<Task<P>>) -> Self {
        Self {
            tasks: RwLock::new(tasks),
        }
    }

    /// Swap the task list; waits for in-flight runs to finish
    pub async fn replace_tasks(&self, tasks: Vec<Task<P>>) {
        let mut guard = self.tasks.write().await;
        *guard = tasks;
    }

    /// Names of the current steps, in order
    pub async fn task_names(&self) -> Vec<String> {
        self.tasks
            .read()
            .await
            .iter()
            .map(|t| t.name.clone())
            .collect()
    }

    /// Run every step against `params`
    pub async fn run(&self, params: &P) -> Result<PipelineReport, PipelineError> {
        let tasks = self.tasks.read().await;
        let mut report = PipelineReport::default();

        for task in tasks.iter() {
            debug!(task = %task.name, "running reconciliation task");
            report.executed.push(task.name.clone());

            let Err(err) = task.action.run(params).await else {
                continue;
            };

            match TaskFailure::classify(&task.name, task.bail_on_error, err) {
                TaskFailure::NotActionable { task } => {
                    info!(
                        task = %task,
                        "namespace is being terminated, stopping reconciliation"
                    );
                    observability::metrics::increment_namespace_terminating();
                    report.halted_by_namespace_termination = true;
                    return Ok(report);
                }
                TaskFailure::StepFailed { task, source } => {
                    error!(task = %task, error = %source, "failed to reconcile");
                    observability::metrics::increment_task_failures(&task, true);
                    return Err(PipelineError::StepFailed { task, source });
                }
                TaskFailure::StepFailedIgnored { task, source } => {
                    warn!(
                        task = %task,
                        error = %source,
                        "failed to reconcile, continuing with the next task"
                    );
                    observability::metrics::increment_task_failures(&task, false);
                    report.ignored.push(IgnoredFailure {
                        task,
                        message: source.to_string(),
                    });
                }
            }
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct Trace(Mutex<Vec<&'static str>>);

    struct Step {
        name: &'static str,
        fail: bool,
    }

    #[async_trait]
    impl TaskAction<Trace> for Step {
        async fn run(&self, trace: &Trace) -> Result<(), TaskError> {
            trace.0.lock().expect("trace lock").push(self.name);
            if self.fail {
                Err(TaskError::Failed(format!("{} failed", self.name)))
            } else {
                Ok(())
            }
        }
    }

    fn task(name: &'static str, bail: bool, fail: bool) -> Task<Trace> {
        Task::new(name, bail, Step { name, fail })
    }

    #[tokio::test]
    async fn test_ignored_failure_recorded() {
        let pipeline = TaskPipeline::new(vec![task("a", false, true), task("b", true, false)]);
        let trace = Trace::default();
        let report = pipeline.run(&trace).await.expect("run succeeds");
        assert_eq!(*trace.0.lock().expect("trace lock"), vec!["a", "b"]);
        assert_eq!(
            report.ignored,
            vec![IgnoredFailure {
                task: "a".to_string(),
                message: "a failed".to_string()
            }]
        );
        assert!(!report.halted_by_namespace_termination);
    }

    #[tokio::test]
    async fn test_empty_pipeline_succeeds() {
        let pipeline: TaskPipeline<Trace> = TaskPipeline::new(Vec::new());
        let report = pipeline.run(&Trace::default()).await.expect("run succeeds");
        assert_eq!(report, PipelineReport::default());
    }

    #[tokio::test]
    async fn test_task_names_in_order() {
        let pipeline = TaskPipeline::new(vec![task("x", true, false), task("y", true, false)]);
        assert_eq!(pipeline.task_names().await, vec!["x", "y"]);
    }
}
