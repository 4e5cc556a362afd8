//! # Custom Resource Definitions
//!
//! CRD types for the CloudWatch agent operator.
//!
//! ## Module Structure
//!
//! - `spec.rs` - `AmazonCloudWatchAgent` specification, agent mode and auxiliary ConfigMaps
//! - `status.rs` - Status types written by the final reconciliation step

mod spec;
mod status;

pub use spec::{AgentMode, AmazonCloudWatchAgent, AmazonCloudWatchAgentSpec, ConfigMapsSpec};
pub use status::{AmazonCloudWatchAgentStatus, Condition};
