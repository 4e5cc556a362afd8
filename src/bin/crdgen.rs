//! # CRD Generator
//!
//! Prints the `AmazonCloudWatchAgent` CustomResourceDefinition as YAML.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin crdgen > config/crd/amazoncloudwatchagents.yaml
//! cargo run --bin crdgen | kubectl apply -f -
//! ```

use cloudwatch_agent_operator::crd::AmazonCloudWatchAgent;
use kube::CustomResourceExt;

fn main() -> anyhow::Result<()> {
    print!("{}", serde_yaml::to_string(&AmazonCloudWatchAgent::crd())?);
    Ok(())
}
