//! # Naming
//!
//! Names of the objects and volumes derived from an `AmazonCloudWatchAgent`.

use crate::constants::MAX_DNS_LABEL_LEN;

/// Truncate `value` to at most `max` characters
///
/// When characters are removed, any trailing non-alphanumeric characters left
/// at the cut are removed too, so `agent-metrics-receiver` cut at 6 becomes
/// `agent` rather than `agent-`.
#[must_use]
pub fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        return value.to_string();
    }
    let cut: String = value.chars().take(max).collect();
    cut.trim_end_matches(|c: char| !c.is_ascii_alphanumeric())
        .to_string()
}

/// Turn an arbitrary string into a valid DNS-1123 label
///
/// Lowercases, replaces every character outside `[a-z0-9-]` with `-`, and
/// strips non-alphanumeric characters from both ends.
#[must_use]
pub fn dns_name(value: &str) -> String {
    let replaced: String = value
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect();
    replaced
        .trim_matches(|c: char| !c.is_ascii_alphanumeric())
        .to_string()
}

/// Name of the ConfigMap holding the primary agent configuration
#[must_use]
pub fn config_map(instance: &str) -> String {
    dns_name(&truncate(instance, MAX_DNS_LABEL_LEN))
}

/// Volume name (and mount directory) of an auxiliary ConfigMap
#[must_use]
pub fn config_map_extra(name: &str) -> String {
    dns_name(&truncate(&format!("configmap-{name}"), MAX_DNS_LABEL_LEN))
}

/// Name of the ServiceAccount created for the agent
#[must_use]
pub fn service_account(instance: &str) -> String {
    dns_name(&truncate(instance, MAX_DNS_LABEL_LEN))
}

/// Name of the Service exposing the agent ports
#[must_use]
pub fn service(instance: &str) -> String {
    dns_name(&truncate(instance, MAX_DNS_LABEL_LEN))
}

/// Name of the Deployment or DaemonSet running the agent
#[must_use]
pub fn workload(instance: &str) -> String {
    dns_name(&truncate(instance, MAX_DNS_LABEL_LEN))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_value_untouched() {
        assert_eq!(truncate("emfTcp", 15), "emfTcp");
        assert_eq!(truncate("appSignalsProxy", 15), "appSignalsProxy");
    }

    #[test]
    fn test_truncate_cuts_and_trims_tail() {
        assert_eq!(truncate("agent-metrics-receiver", 6), "agent");
        assert_eq!(truncate("containerinsightsreceiver", 15), "containerinsigh");
    }

    #[test]
    fn test_dns_name_sanitizes() {
        assert_eq!(dns_name("My_Config.Map"), "my-config-map");
        assert_eq!(dns_name("--edge--"), "edge");
    }

    #[test]
    fn test_config_map_extra_is_prefixed_and_bounded() {
        assert_eq!(config_map_extra("prometheus"), "configmap-prometheus");
        let long = "x".repeat(100);
        assert_eq!(config_map_extra(&long).len(), MAX_DNS_LABEL_LEN);
    }
}
