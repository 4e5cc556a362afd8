//! # Constants
//!
//! Shared constants used throughout the operator.
//!
//! These values represent reasonable defaults and can be overridden via
//! configuration or environment variables where applicable.

/// Default HTTP server port for metrics and health probes
pub const DEFAULT_METRICS_PORT: u16 = 8080;

/// Default requeue interval for reconciliation errors (seconds)
pub const DEFAULT_RECONCILIATION_ERROR_REQUEUE_SECS: u64 = 30;

/// Default image used when the resource does not name one
pub const DEFAULT_AGENT_IMAGE: &str = "public.ecr.aws/cloudwatch-agent/cloudwatch-agent:latest";

/// Key of the agent configuration inside the generated ConfigMap
pub const DEFAULT_CONFIG_MAP_ENTRY: &str = "cwagentconfig.json";

/// Field manager used for server-side apply
pub const FIELD_MANAGER: &str = "cloudwatch-agent-operator";

/// Name of the agent container inside the pod
pub const CONTAINER_NAME: &str = "cloudwatch-agent";

/// Volume carrying the primary agent configuration
pub const CONFIG_MAP_VOLUME: &str = "cwagent-config";

/// Mount path of the primary agent configuration
pub const CONFIG_MOUNT_PATH: &str = "/etc/cwagentconfig";

/// Directory the `--config` flag points into
pub const CONFIG_ARG_DIR: &str = "/conf";

/// Base directory for auxiliary configuration bundles
pub const EXTRA_CONFIG_BASE_PATH: &str = "/var/conf";

/// Reserved argument key owned by the operator when the primary config is mounted
pub const RESERVED_CONFIG_ARG: &str = "config";

/// Environment variable exposing the pod's own name
pub const POD_NAME_ENV: &str = "POD_NAME";

/// Proxy variables copied from the operator's environment into the agent
pub const PROXY_ENV_NAMES: [&str; 3] = ["HTTP_PROXY", "HTTPS_PROXY", "NO_PROXY"];

/// Maximum length of a container port name
pub const MAX_PORT_NAME_LEN: usize = 15;

/// Maximum length of a DNS-1123 label
pub const MAX_DNS_LABEL_LEN: usize = 63;

/// A port the agent listens on out of the box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultPort {
    pub name: &'static str,
    pub port: i32,
    pub protocol: &'static str,
}

const fn port(name: &'static str, port: i32, protocol: &'static str) -> DefaultPort {
    DefaultPort {
        name,
        port,
        protocol,
    }
}

/// Receivers exposed by the CloudWatch agent
pub const CLOUDWATCH_AGENT_PORTS: &[DefaultPort] = &[
    port("statsd", 8125, "UDP"),
    port("collectd", 25826, "UDP"),
    port("emfTcp", 25888, "TCP"),
    port("emf-udp", 25888, "UDP"),
    port("xray-proxy", 2000, "TCP"),
    port("xray-traces", 2000, "UDP"),
    port("otlp-grpc", 4317, "TCP"),
    port("otlp-http", 4318, "TCP"),
    port("appsig-grpc", 4315, "TCP"),
    port("appsig-http", 4316, "TCP"),
];

