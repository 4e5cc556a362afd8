//! # Container Ports
//!
//! Resolves the agent's container ports from the default receiver table and
//! the ports declared on the resource.
//!
//! Defaults are truncated to the platform's port-name limit and validated;
//! invalid defaults are dropped with a log line instead of failing the build.
//! Declared ports then replace or extend the defaults by name, and the result
//! is sorted by name so that the emitted container is identical on every pass.

use std::collections::HashMap;
use std::sync::LazyLock;

use k8s_openapi::api::core::v1::{ContainerPort, ServicePort};
use regex::Regex;
use thiserror::Error;
use tracing::info;

use crate::constants::{DefaultPort, MAX_PORT_NAME_LEN};
use crate::controller::manifests::naming;

static PORT_NAME_CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("^[-a-zA-Z0-9]+$").expect("port name charset regex is valid - this should never happen")
});

static PORT_NAME_LETTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("[a-zA-Z]").expect("port name letter regex is valid - this should never happen")
});

/// A default port rejected by validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid container port {name:?} ({number}): {}", .reasons.join("; "))]
pub struct InvalidPortSpec {
    pub name: String,
    pub number: i32,
    pub reasons: Vec<String>,
}

/// Validation errors for a port name, empty when valid
///
/// Names are IANA service names: at most 15 characters, alphanumerics and
/// hyphens, at least one letter, no leading/trailing or doubled hyphen.
#[must_use]
pub fn validate_port_name(name: &str) -> Vec<String> {
    let mut errs = Vec::new();
    if name.len() > MAX_PORT_NAME_LEN {
        errs.push(format!(
            "must be no more than {MAX_PORT_NAME_LEN} characters"
        ));
    }
    if !PORT_NAME_CHARSET.is_match(name) {
        errs.push("must contain only alpha-numeric characters and hyphens (-)".to_string());
    }
    if !PORT_NAME_LETTER.is_match(name) {
        errs.push("must contain at least one letter".to_string());
    }
    if name.contains("--") {
        errs.push("must not contain consecutive hyphens".to_string());
    }
    if name.starts_with('-') || name.ends_with('-') {
        errs.push("must not begin or end with a hyphen".to_string());
    }
    errs
}

/// Validation errors for a port number, empty when valid
#[must_use]
pub fn validate_port_number(number: i32) -> Vec<String> {
    if (1..=65535).contains(&number) {
        Vec::new()
    } else {
        vec!["must be between 1 and 65535, inclusive".to_string()]
    }
}

/// Validate a name/number pair
pub fn validate_port(name: &str, number: i32) -> Result<(), InvalidPortSpec> {
    let mut reasons = validate_port_name(name);
    reasons.extend(validate_port_number(number));
    if reasons.is_empty() {
        Ok(())
    } else {
        Err(InvalidPortSpec {
            name: name.to_string(),
            number,
            reasons,
        })
    }
}

/// Default ports keyed by (possibly truncated) name
pub fn default_container_ports(defaults: &[DefaultPort]) -> HashMap<String, ContainerPort> {
    let mut ports = HashMap::with_capacity(defaults.len());
    for p in defaults {
        let name = naming::truncate(p.name, MAX_PORT_NAME_LEN);
        if name != p.name {
            info!(
                port.name.prev = p.name,
                port.name.new = name.as_str(),
                "truncating container port name"
            );
        }
        if let Err(e) = validate_port(&name, p.port) {
            info!(
                port.name = name.as_str(),
                port.num = p.port,
                error = %e,
                "dropping invalid container port"
            );
            continue;
        }
        ports.insert(
            name.clone(),
            ContainerPort {
                name: Some(name),
                container_port: p.port,
                protocol: Some(p.protocol.to_string()),
                ..Default::default()
            },
        );
    }
    ports
}

/// Resolve the container ports: defaults overlaid with declared ports, sorted by name
pub fn resolve_ports(defaults: &[DefaultPort], declared: &[ServicePort]) -> Vec<ContainerPort> {
    let mut ports = default_container_ports(defaults);
    for p in declared {
        let name = p.name.clone().unwrap_or_default();
        ports.insert(
            name.clone(),
            ContainerPort {
                name: Some(name),
                container_port: p.port,
                protocol: p.protocol.clone(),
                ..Default::default()
            },
        );
    }
    port_map_to_list(ports)
}

fn port_map_to_list(ports: HashMap<String, ContainerPort>) -> Vec<ContainerPort> {
    let mut list: Vec<(String, ContainerPort)> = ports.into_iter().collect();
    list.sort_unstable_by(|a, b| a.0.cmp(&b.0));
    list.into_iter().map(|(_, port)| port).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::CLOUDWATCH_AGENT_PORTS;

    fn names(ports: &[ContainerPort]) -> Vec<&str> {
        ports.iter().filter_map(|p| p.name.as_deref()).collect()
    }

    #[test]
    fn test_default_table_is_valid() {
        let ports = resolve_ports(CLOUDWATCH_AGENT_PORTS, &[]);
        assert_eq!(ports.len(), CLOUDWATCH_AGENT_PORTS.len());
        let emf = ports
            .iter()
            .find(|p| p.name.as_deref() == Some("emfTcp"))
            .expect("emfTcp present");
        assert_eq!(emf.container_port, 25888);
        assert_eq!(emf.protocol.as_deref(), Some("TCP"));
    }

    #[test]
    fn test_output_sorted_by_name() {
        let ports = resolve_ports(CLOUDWATCH_AGENT_PORTS, &[]);
        let names = names(&ports);
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }

    #[test]
    fn test_long_name_truncated_and_kept() {
        let defaults = [DefaultPort {
            name: "containerinsightsreceiver",
            port: 4311,
            protocol: "TCP",
        }];
        let ports = resolve_ports(&defaults, &[]);
        assert_eq!(names(&ports), vec!["containerinsigh"]);
    }

    #[test]
    fn test_invalid_defaults_dropped() {
        let defaults = [
            DefaultPort {
                name: "bad_name",
                port: 1000,
                protocol: "TCP",
            },
            DefaultPort {
                name: "zero",
                port: 0,
                protocol: "TCP",
            },
            DefaultPort {
                name: "12345",
                port: 1001,
                protocol: "TCP",
            },
            DefaultPort {
                name: "good",
                port: 1002,
                protocol: "UDP",
            },
        ];
        let ports = resolve_ports(&defaults, &[]);
        assert_eq!(names(&ports), vec!["good"]);
    }

    #[test]
    fn test_declared_port_replaces_default() {
        let declared = [ServicePort {
            name: Some("statsd".to_string()),
            port: 9125,
            ..Default::default()
        }];
        let ports = resolve_ports(CLOUDWATCH_AGENT_PORTS, &declared);
        let statsd: Vec<_> = ports
            .iter()
            .filter(|p| p.name.as_deref() == Some("statsd"))
            .collect();
        assert_eq!(statsd.len(), 1);
        assert_eq!(statsd[0].container_port, 9125);
        assert_eq!(ports.len(), CLOUDWATCH_AGENT_PORTS.len());
    }

    #[test]
    fn test_declared_port_added() {
        let declared = [ServicePort {
            name: Some("custom".to_string()),
            port: 7000,
            protocol: Some("TCP".to_string()),
            ..Default::default()
        }];
        let ports = resolve_ports(CLOUDWATCH_AGENT_PORTS, &declared);
        assert_eq!(ports.len(), CLOUDWATCH_AGENT_PORTS.len() + 1);
        assert!(names(&ports).contains(&"custom"));
    }

    #[test]
    fn test_validate_port_name_rules() {
        assert!(validate_port_name("emfTcp").is_empty());
        assert!(!validate_port_name("a--b").is_empty());
        assert!(!validate_port_name("-ab").is_empty());
        assert!(!validate_port_name("1234").is_empty());
        assert!(!validate_port_name("abcdefghijklmnop").is_empty());
        assert!(validate_port_number(65535).is_empty());
        assert!(!validate_port_number(65536).is_empty());
    }
}
