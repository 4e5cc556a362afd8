//! # Owned Objects
//!
//! Desired state of the ConfigMap, ServiceAccount and Service owned by an
//! `AmazonCloudWatchAgent`.

use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::{ConfigMap, Service, ServiceAccount, ServicePort, ServiceSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use kube::{Resource, ResourceExt};

use crate::config::ControllerConfig;
use crate::constants::CLOUDWATCH_AGENT_PORTS;
use crate::controller::manifests::{container, labels, naming, ports};
use crate::crd::AmazonCloudWatchAgent;

/// Metadata shared by every owned object: name, namespace, labels and a
/// controller owner reference back to the instance
#[must_use]
pub fn owned_metadata(
    config: &ControllerConfig,
    instance: &AmazonCloudWatchAgent,
    name: String,
) -> ObjectMeta {
    ObjectMeta {
        name: Some(name),
        namespace: instance.namespace(),
        labels: Some(labels::labels(
            instance,
            container::agent_image(config, &instance.spec),
        )),
        owner_references: instance.controller_owner_ref(&()).map(|owner| vec![owner]),
        ..Default::default()
    }
}

/// ConfigMap carrying the agent configuration under the configured entry key
#[must_use]
pub fn config_map(config: &ControllerConfig, instance: &AmazonCloudWatchAgent) -> ConfigMap {
    ConfigMap {
        metadata: owned_metadata(config, instance, naming::config_map(&instance.name_any())),
        data: Some(BTreeMap::from([(
            config.config_map_entry.clone(),
            instance.spec.config.clone(),
        )])),
        ..Default::default()
    }
}

/// Name of the ServiceAccount the agent pods run as
#[must_use]
pub fn service_account_name(instance: &AmazonCloudWatchAgent) -> String {
    match instance.spec.service_account.as_deref() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => naming::service_account(&instance.name_any()),
    }
}

/// ServiceAccount for the agent, `None` when the resource names an existing one
#[must_use]
pub fn service_account(
    config: &ControllerConfig,
    instance: &AmazonCloudWatchAgent,
) -> Option<ServiceAccount> {
    if instance
        .spec
        .service_account
        .as_deref()
        .is_some_and(|name| !name.is_empty())
    {
        return None;
    }
    Some(ServiceAccount {
        metadata: owned_metadata(config, instance, service_account_name(instance)),
        ..Default::default()
    })
}

/// Service exposing the agent's container ports, `None` when there are none
///
/// Service port names must be DNS-1123 labels, so container port names such
/// as `emfTcp` are lowercased.
#[must_use]
pub fn service(config: &ControllerConfig, instance: &AmazonCloudWatchAgent) -> Option<Service> {
    let service_ports: Vec<ServicePort> =
        ports::resolve_ports(CLOUDWATCH_AGENT_PORTS, &instance.spec.ports)
            .into_iter()
            .map(|p| ServicePort {
                name: p.name.map(|n| naming::dns_name(&n)).filter(|n| !n.is_empty()),
                port: p.container_port,
                target_port: Some(IntOrString::Int(p.container_port)),
                protocol: p.protocol,
                ..Default::default()
            })
            .collect();

    if service_ports.is_empty() {
        return None;
    }

    Some(Service {
        metadata: owned_metadata(config, instance, naming::service(&instance.name_any())),
        spec: Some(ServiceSpec {
            selector: Some(labels::selector_labels(instance)),
            ports: Some(service_ports),
            ..Default::default()
        }),
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crd::AmazonCloudWatchAgentSpec;

    fn instance(spec: AmazonCloudWatchAgentSpec) -> AmazonCloudWatchAgent {
        let mut agent = AmazonCloudWatchAgent::new("agent", spec);
        agent.metadata.namespace = Some("amazon-cloudwatch".to_string());
        agent.metadata.uid = Some("1f0c6a4e-0000-4000-8000-000000000001".to_string());
        agent
    }

    #[test]
    fn test_config_map_holds_config_under_entry() {
        let config = ControllerConfig::default();
        let agent = instance(AmazonCloudWatchAgentSpec {
            config: r#"{"logs":{}}"#.to_string(),
            ..Default::default()
        });
        let cm = config_map(&config, &agent);
        assert_eq!(cm.metadata.name.as_deref(), Some("agent"));
        assert_eq!(cm.metadata.namespace.as_deref(), Some("amazon-cloudwatch"));
        assert_eq!(
            cm.data.unwrap_or_default().get("cwagentconfig.json").map(String::as_str),
            Some(r#"{"logs":{}}"#)
        );
        let owners = cm.metadata.owner_references.unwrap_or_default();
        assert_eq!(owners.len(), 1);
        assert_eq!(owners[0].kind, "AmazonCloudWatchAgent");
        assert_eq!(owners[0].controller, Some(true));
    }

    #[test]
    fn test_service_account_skipped_when_named() {
        let config = ControllerConfig::default();
        let agent = instance(AmazonCloudWatchAgentSpec {
            service_account: Some("existing".to_string()),
            ..Default::default()
        });
        assert!(service_account(&config, &agent).is_none());
        assert_eq!(service_account_name(&agent), "existing");

        let agent = instance(AmazonCloudWatchAgentSpec::default());
        assert!(service_account(&config, &agent).is_some());
        assert_eq!(service_account_name(&agent), "agent");
    }

    #[test]
    fn test_service_targets_container_ports() {
        let config = ControllerConfig::default();
        let agent = instance(AmazonCloudWatchAgentSpec::default());
        let svc = service(&config, &agent).expect("default ports yield a service");
        let spec = svc.spec.expect("service spec");
        let ports = spec.ports.unwrap_or_default();
        assert_eq!(ports.len(), CLOUDWATCH_AGENT_PORTS.len());
        for p in &ports {
            assert_eq!(p.target_port, Some(IntOrString::Int(p.port)));
        }
        assert_eq!(spec.selector, Some(labels::selector_labels(&agent)));
    }

    #[test]
    fn test_service_port_names_are_dns_labels() {
        let label = regex::Regex::new("^[a-z0-9]([-a-z0-9]*[a-z0-9])?$").expect("valid regex");
        let agent = instance(AmazonCloudWatchAgentSpec {
            ports: vec![ServicePort {
                name: Some("customTcp".to_string()),
                port: 9100,
                ..Default::default()
            }],
            ..Default::default()
        });
        let svc = service(&ControllerConfig::default(), &agent).expect("service");
        let names: Vec<String> = svc
            .spec
            .and_then(|s| s.ports)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|p| p.name)
            .collect();

        assert_eq!(names.len(), CLOUDWATCH_AGENT_PORTS.len() + 1);
        for name in &names {
            assert!(label.is_match(name), "{name} is not a DNS-1123 label");
        }
        assert!(names.iter().any(|n| n == "emftcp"));
        assert!(names.iter().any(|n| n == "customtcp"));
    }
}
