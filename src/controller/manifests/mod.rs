//! # Manifests
//!
//! Desired state of every object the operator owns, computed from an
//! `AmazonCloudWatchAgent` and the operator configuration. Nothing in here
//! talks to the API server.
//!
//! ## Module Structure
//!
//! - `naming.rs` - object and volume names
//! - `labels.rs` - common and selector labels
//! - `ports.rs` - container ports from the default table plus declared ports
//! - `args.rs` - container arguments
//! - `env.rs` - container environment
//! - `volumes.rs` - volume mounts and pod volumes
//! - `container.rs` - the agent container
//! - `objects.rs` - ConfigMap, ServiceAccount, Service
//! - `workload.rs` - pod template, Deployment, DaemonSet

pub mod args;
pub mod container;
pub mod env;
pub mod labels;
pub mod naming;
pub mod objects;
pub mod ports;
pub mod volumes;
pub mod workload;

pub use container::container;
