//! # Prelude
//!
//! Re-exports commonly used types and traits for convenience.
//!
//! ## Usage
//!
//! ```rust
//! use cloudwatch_agent_operator::prelude::*;
//! ```
//!
//! This brings into scope:
//! - All CRD types (AmazonCloudWatchAgent, AgentMode, etc.)
//! - Pipeline and reconciler types (Task, TaskPipeline, Reconciler, etc.)
//! - Config types (ControllerConfig, ServerConfig)

pub use crate::crd::*;

pub use crate::controller::reconciler::{
    default_tasks, reconcile, Params, PipelineError, PipelineReport, Reconciler,
    ReconcilerError, Task, TaskAction, TaskError, TaskPipeline,
};

pub use crate::config::{
    ControllerConfig, ServerConfig, SharedControllerConfig, SharedServerConfig,
};
