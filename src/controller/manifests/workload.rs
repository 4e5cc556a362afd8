//! # Workloads
//!
//! Pod template plus the Deployment and DaemonSet that run it. Only one of
//! the two exists at a time, chosen by `spec.mode`.

use k8s_openapi::api::apps::v1::{DaemonSet, DaemonSetSpec, Deployment, DeploymentSpec};
use k8s_openapi::api::core::v1::{PodSpec, PodTemplateSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta};
use kube::ResourceExt;

use crate::config::ControllerConfig;
use crate::controller::manifests::{container, labels, naming, objects, volumes};
use crate::crd::{AgentMode, AmazonCloudWatchAgent};

/// Pod template shared by both workload kinds
///
/// The primary configuration is always mounted here.
#[must_use]
pub fn pod_template(config: &ControllerConfig, instance: &AmazonCloudWatchAgent) -> PodTemplateSpec {
    let spec = &instance.spec;
    let image = container::agent_image(config, spec);

    PodTemplateSpec {
        metadata: Some(ObjectMeta {
            labels: Some(labels::labels(instance, image)),
            annotations: (!spec.pod_annotations.is_empty()).then(|| spec.pod_annotations.clone()),
            ..Default::default()
        }),
        spec: Some(PodSpec {
            containers: vec![container::container(config, spec, true)],
            volumes: Some(volumes::volumes(
                &naming::config_map(&instance.name_any()),
                &config.config_map_entry,
                spec,
            )),
            service_account_name: Some(objects::service_account_name(instance)),
            node_selector: (!spec.node_selector.is_empty()).then(|| spec.node_selector.clone()),
            tolerations: (!spec.tolerations.is_empty()).then(|| spec.tolerations.clone()),
            host_network: spec.host_network.then_some(true),
            dns_policy: spec
                .host_network
                .then(|| "ClusterFirstWithHostNet".to_string()),
            priority_class_name: spec.priority_class_name.clone(),
            ..Default::default()
        }),
    }
}

fn selector(instance: &AmazonCloudWatchAgent) -> LabelSelector {
    LabelSelector {
        match_labels: Some(labels::selector_labels(instance)),
        ..Default::default()
    }
}

/// Deployment running the agent, `None` unless the mode is `deployment`
#[must_use]
pub fn deployment(config: &ControllerConfig, instance: &AmazonCloudWatchAgent) -> Option<Deployment> {
    (instance.spec.mode == AgentMode::Deployment).then(|| Deployment {
        metadata: objects::owned_metadata(config, instance, naming::workload(&instance.name_any())),
        spec: Some(DeploymentSpec {
            replicas: instance.spec.replicas,
            selector: selector(instance),
            template: pod_template(config, instance),
            ..Default::default()
        }),
        ..Default::default()
    })
}

/// DaemonSet running the agent, `None` unless the mode is `daemonset`
#[must_use]
pub fn daemon_set(config: &ControllerConfig, instance: &AmazonCloudWatchAgent) -> Option<DaemonSet> {
    (instance.spec.mode == AgentMode::DaemonSet).then(|| DaemonSet {
        metadata: objects::owned_metadata(config, instance, naming::workload(&instance.name_any())),
        spec: Some(DaemonSetSpec {
            selector: selector(instance),
            template: pod_template(config, instance),
            ..Default::default()
        }),
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crd::{AmazonCloudWatchAgentSpec, ConfigMapsSpec};

    fn instance(mode: AgentMode) -> AmazonCloudWatchAgent {
        let mut agent = AmazonCloudWatchAgent::new(
            "agent",
            AmazonCloudWatchAgentSpec {
                mode,
                replicas: Some(2),
                config_maps: vec![ConfigMapsSpec {
                    name: "prometheus".to_string(),
                    mount_path: "prom".to_string(),
                }],
                ..Default::default()
            },
        );
        agent.metadata.namespace = Some("amazon-cloudwatch".to_string());
        agent
    }

    #[test]
    fn test_mode_selects_workload_kind() {
        let config = ControllerConfig::default();
        let deploy = instance(AgentMode::Deployment);
        assert!(deployment(&config, &deploy).is_some());
        assert!(daemon_set(&config, &deploy).is_none());

        let ds = instance(AgentMode::DaemonSet);
        assert!(deployment(&config, &ds).is_none());
        assert!(daemon_set(&config, &ds).is_some());
    }

    #[test]
    fn test_deployment_selector_matches_template() {
        let config = ControllerConfig::default();
        let agent = instance(AgentMode::Deployment);
        let spec = deployment(&config, &agent)
            .and_then(|d| d.spec)
            .expect("deployment spec");
        assert_eq!(spec.replicas, Some(2));
        let template_labels = spec
            .template
            .metadata
            .and_then(|m| m.labels)
            .unwrap_or_default();
        for (k, v) in spec.selector.match_labels.unwrap_or_default() {
            assert_eq!(template_labels.get(&k), Some(&v));
        }
    }

    #[test]
    fn test_pod_template_volumes_and_service_account() {
        let config = ControllerConfig::default();
        let agent = instance(AgentMode::DaemonSet);
        let pod = pod_template(&config, &agent).spec.expect("pod spec");
        let names: Vec<String> = pod
            .volumes
            .unwrap_or_default()
            .into_iter()
            .map(|v| v.name)
            .collect();
        assert_eq!(names, vec!["cwagent-config", "configmap-prometheus"]);
        assert_eq!(pod.service_account_name.as_deref(), Some("agent"));
        assert!(pod.host_network.is_none());
        assert_eq!(pod.containers.len(), 1);
    }
}
