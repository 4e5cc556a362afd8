//! # Reconciler
//!
//! Core reconciliation logic for `AmazonCloudWatchAgent` resources.
//!
//! ## Reconciliation Flow
//!
//! 1. Fetch the resource by namespace and name (gone means done)
//! 2. Build the per-pass `Params`
//! 3. Run the task pipeline:
//!    config maps, service accounts, services, deployments, daemon sets, status
//! 4. On a propagated step failure, record a Warning event and return the error

pub mod error;
pub mod pipeline;
pub mod reconcile;
pub mod steps;
pub mod types;

pub use error::{PipelineError, ReconcilerError, TaskError, TaskFailure};
pub use pipeline::{IgnoredFailure, PipelineReport, Task, TaskAction, TaskPipeline};
pub use reconcile::reconcile;
pub use steps::default_tasks;
pub use types::{Params, Reconciler};
