//! # Agent Container
//!
//! Composes ports, arguments, environment and mounts into the agent's
//! container. The result depends only on the operator configuration, the
//! resource spec and `add_config`; two calls with the same inputs return
//! equal containers, element order included.

use k8s_openapi::api::core::v1::Container;

use crate::config::ControllerConfig;
use crate::constants::{CLOUDWATCH_AGENT_PORTS, CONTAINER_NAME};
use crate::controller::manifests::{args, env, ports, volumes};
use crate::crd::AmazonCloudWatchAgentSpec;

/// Image to run: the resource's image if set, otherwise the operator default
#[must_use]
pub fn agent_image<'a>(config: &'a ControllerConfig, spec: &'a AmazonCloudWatchAgentSpec) -> &'a str {
    match spec.image.as_deref() {
        Some(image) if !image.is_empty() => image,
        _ => &config.agent_image,
    }
}

/// Build the agent container
#[must_use]
pub fn container(
    config: &ControllerConfig,
    spec: &AmazonCloudWatchAgentSpec,
    add_config: bool,
) -> Container {
    Container {
        name: CONTAINER_NAME.to_string(),
        image: Some(agent_image(config, spec).to_string()),
        image_pull_policy: spec.image_pull_policy.clone(),
        args: non_empty(args::assemble_args(
            &config.config_map_entry,
            &spec.args,
            add_config,
        )),
        env: non_empty(env::compose_env(&spec.env, &config.proxy_env)),
        env_from: non_empty(spec.env_from.clone()),
        ports: non_empty(ports::resolve_ports(CLOUDWATCH_AGENT_PORTS, &spec.ports)),
        volume_mounts: non_empty(volumes::plan_volume_mounts(spec, add_config)),
        resources: spec.resources.clone(),
        security_context: spec.security_context.clone(),
        lifecycle: spec.lifecycle.clone(),
        ..Default::default()
    }
}

fn non_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
    (!items.is_empty()).then_some(items)
}
