//! CloudWatch Agent Operator Library
//!
//! Reconciles `AmazonCloudWatchAgent` resources into the ConfigMap,
//! ServiceAccount, Service and Deployment or DaemonSet that run the agent.
//!
//! ## Quick Start
//!
//! ```rust
//! use cloudwatch_agent_operator::prelude::*;
//! ```
//!
//! This brings commonly used types and traits into scope. For more specific imports,
//! use the individual modules.

pub mod config;
pub mod constants;
pub mod controller;
pub mod crd;
pub mod observability;
pub mod prelude;
pub mod runtime;
