//! # Runtime
//!
//! - `initialization`: rustls, tracing, metrics, server and client setup
//! - `watch_loop`: the kube-runtime controller
//! - `error_policy`: requeue decisions after failed reconciliations

pub mod error_policy;
pub mod initialization;
pub mod watch_loop;

pub use initialization::{initialize, InitializationResult};
pub use watch_loop::run_watch_loop;
