//! # Initialization
//!
//! Operator start-up: rustls setup, tracing, metrics, server startup, and
//! Kubernetes client setup.

use crate::config::{create_shared_config, SharedControllerConfig};
use crate::controller::reconciler::Reconciler;
use crate::controller::server::{start_server, ServerState};
use crate::crd::AmazonCloudWatchAgent;
use crate::observability;
use anyhow::{Context, Result};
use kube::{api::Api, Client};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Everything the watch loop needs
pub struct InitializationResult {
    /// Kubernetes client
    pub client: Client,
    /// API for AmazonCloudWatchAgent resources in all namespaces
    pub agents: Api<AmazonCloudWatchAgent>,
    /// Reconciler context
    pub reconciler: Arc<Reconciler>,
    /// Server state for health checks
    pub server_state: Arc<ServerState>,
    pub controller_config: SharedControllerConfig,
}

impl std::fmt::Debug for InitializationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InitializationResult")
            .field("server_ready", &self.server_state.is_ready.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

/// Initialize the operator runtime
///
/// This function handles:
/// - rustls crypto provider setup
/// - Tracing subscriber setup
/// - Metrics registration
/// - HTTP server startup
/// - Kubernetes client creation
/// - Reconciler setup
pub async fn initialize() -> Result<InitializationResult> {
    // Must happen before any TLS connection; an already installed provider is fine.
    let _ = rustls::crypto::ring::default_provider().install_default();

    let (controller_config, server_config) = create_shared_config();

    {
        let config = controller_config.read().await;
        init_tracing(&config.log_level, &config.log_format);
    }

    info!(version = env!("CARGO_PKG_VERSION"), "Starting CloudWatch agent operator");

    observability::metrics::register_metrics()?;

    let server_state = Arc::new(ServerState {
        is_ready: Arc::new(AtomicBool::new(false)),
    });

    let server_port = server_config.read().await.metrics_port;
    let server_state_clone = Arc::clone(&server_state);
    tokio::spawn(async move {
        if let Err(e) = start_server(server_port, server_state_clone).await {
            error!(error = %e, "HTTP server error");
        }
    });

    let client = Client::try_default()
        .await
        .context("Failed to create Kubernetes client")?;

    let agents: Api<AmazonCloudWatchAgent> = Api::all(client.clone());

    let config_snapshot = Arc::new(controller_config.read().await.clone());
    info!(
        agent_image = %config_snapshot.agent_image,
        proxy_vars = config_snapshot.proxy_env.len(),
        "Loaded controller configuration"
    );
    let reconciler = Arc::new(Reconciler::new(client.clone(), config_snapshot));

    info!("Operator initialized, starting watch loop...");

    Ok(InitializationResult {
        client,
        agents,
        reconciler,
        server_state,
        controller_config,
    })
}

/// Install the global tracing subscriber
///
/// `RUST_LOG` wins when set; otherwise the operator logs at `LOG_LEVEL`.
fn init_tracing(log_level: &str, log_format: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_directive(log_level)));

    let result = if log_format.eq_ignore_ascii_case("json") {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(true)
            .try_init()
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).try_init()
    };

    if let Err(e) = result {
        eprintln!("tracing subscriber already initialized: {e}");
    }
}

/// Filter directive for the operator's own crate at `log_level`
///
/// Unknown levels fall back to info.
fn default_log_directive(log_level: &str) -> String {
    let level = match log_level.to_ascii_lowercase().as_str() {
        level @ ("error" | "warn" | "info" | "debug" | "trace") => level.to_string(),
        _ => "info".to_string(),
    };
    format!("cloudwatch_agent_operator={level}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_directive_uses_log_level() {
        assert_eq!(default_log_directive("DEBUG"), "cloudwatch_agent_operator=debug");
        assert_eq!(default_log_directive("warn"), "cloudwatch_agent_operator=warn");
    }

    #[test]
    fn test_default_log_directive_unknown_level() {
        assert_eq!(default_log_directive("verbose"), "cloudwatch_agent_operator=info");
        assert_eq!(default_log_directive(""), "cloudwatch_agent_operator=info");
    }
}
