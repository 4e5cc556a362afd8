//! # Configuration
//!
//! Operator and HTTP server configuration.
//!
//! - `controller.rs` - reconciliation defaults (agent image, config entry, proxy snapshot)
//! - `ServerConfig` - metrics/probe server settings

mod controller;

pub use controller::{ControllerConfig, ServerConfig};

use std::sync::Arc;
use tokio::sync::RwLock;

/// Controller configuration shared between the watch loop and the reconciler
pub type SharedControllerConfig = Arc<RwLock<ControllerConfig>>;

/// Server configuration shared with the HTTP server
pub type SharedServerConfig = Arc<RwLock<ServerConfig>>;

/// Load both configurations from the environment and wrap them for sharing
pub fn create_shared_config() -> (SharedControllerConfig, SharedServerConfig) {
    (
        Arc::new(RwLock::new(ControllerConfig::from_env())),
        Arc::new(RwLock::new(ServerConfig::from_env())),
    )
}
