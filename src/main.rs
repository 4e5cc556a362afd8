//! # CloudWatch Agent Operator
//!
//! Kubernetes operator that turns `AmazonCloudWatchAgent` resources into
//! running CloudWatch agents.

use anyhow::Result;
use cloudwatch_agent_operator::runtime::{initialize, run_watch_loop};

#[tokio::main]
async fn main() -> Result<()> {
    let init = initialize().await?;

    run_watch_loop(
        init.client,
        init.agents,
        init.reconciler,
        init.server_state,
        init.controller_config,
    )
    .await
}
