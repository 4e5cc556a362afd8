//! # Controller
//!
//! Core controller modules for the CloudWatch agent operator.
//!
//! - `manifests`: desired state of the owned objects
//! - `reconciler`: task pipeline and reconciliation logic
//! - `server`: HTTP server for metrics and health checks

pub mod manifests;
pub mod reconciler;
pub mod server;
