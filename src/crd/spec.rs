//! # AmazonCloudWatchAgent Spec
//!
//! Main CRD specification types and default values.

use std::collections::{BTreeMap, HashMap};

use k8s_openapi::api::core::v1::{
    EnvFromSource, EnvVar, Lifecycle, ResourceRequirements, SecurityContext, ServicePort,
    Toleration, Volume, VolumeMount,
};
use serde::{Deserialize, Serialize};

/// AmazonCloudWatchAgent Custom Resource Definition
///
/// Declares a CloudWatch agent deployment. The operator turns it into a
/// ConfigMap, ServiceAccount, Service and either a Deployment or a DaemonSet.
///
/// # Example
///
/// ```yaml
/// apiVersion: cloudwatch.aws.amazon.com/v1alpha1
/// kind: AmazonCloudWatchAgent
/// metadata:
///   name: cloudwatch-agent
///   namespace: amazon-cloudwatch
/// spec:
///   mode: daemonset
///   config: |
///     {"logs": {"metrics_collected": {"emf": {}}}}
///   args:
///     mode: ec2
///   configMaps:
///     - name: prometheus-scrape
///       mountPath: prometheus
/// ```
#[derive(
    kube::CustomResource, Debug, Clone, Default, Deserialize, Serialize, schemars::JsonSchema,
)]
#[kube(
    kind = "AmazonCloudWatchAgent",
    group = "cloudwatch.aws.amazon.com",
    version = "v1alpha1",
    namespaced,
    status = "crate::crd::AmazonCloudWatchAgentStatus",
    shortname = "cwagent",
    printcolumn = r#"{"name":"Mode", "type":"string", "jsonPath":".spec.mode"}, {"name":"Version", "type":"string", "jsonPath":".status.version"}, {"name":"Ready", "type":"string", "jsonPath":".status.conditions[?(@.type==\"Ready\")].status"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct AmazonCloudWatchAgentSpec {
    /// Workload kind used to run the agent
    #[serde(default)]
    pub mode: AgentMode,
    /// Replica count, only meaningful in `deployment` mode
    #[serde(default)]
    pub replicas: Option<i32>,
    /// Agent image; the operator default is used when empty
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub image_pull_policy: Option<String>,
    /// Agent configuration (JSON) stored in the generated ConfigMap
    #[serde(default)]
    pub config: String,
    /// Extra command-line flags rendered as `--key=value`
    #[serde(default)]
    pub args: HashMap<String, String>,
    #[serde(default)]
    pub env: Vec<EnvVar>,
    #[serde(default)]
    pub env_from: Vec<EnvFromSource>,
    #[serde(default)]
    pub volume_mounts: Vec<VolumeMount>,
    #[serde(default)]
    pub volumes: Vec<Volume>,
    /// Additional ConfigMaps mounted under `/var/conf/<mountPath>/configmap-<name>`
    #[serde(default)]
    pub config_maps: Vec<ConfigMapsSpec>,
    /// Ports added to (or overriding) the agent's default receiver ports
    #[serde(default)]
    pub ports: Vec<ServicePort>,
    #[serde(default)]
    pub resources: Option<ResourceRequirements>,
    #[serde(default)]
    pub security_context: Option<SecurityContext>,
    #[serde(default)]
    pub lifecycle: Option<Lifecycle>,
    /// Existing ServiceAccount to run as; the operator creates one when unset
    #[serde(default)]
    pub service_account: Option<String>,
    #[serde(default)]
    pub node_selector: BTreeMap<String, String>,
    #[serde(default)]
    pub tolerations: Vec<Toleration>,
    #[serde(default)]
    pub pod_annotations: BTreeMap<String, String>,
    #[serde(default)]
    pub host_network: bool,
    #[serde(default)]
    pub priority_class_name: Option<String>,
}

/// How the agent is scheduled
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum AgentMode {
    #[default]
    Deployment,
    DaemonSet,
}

impl AgentMode {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentMode::Deployment => "deployment",
            AgentMode::DaemonSet => "daemonset",
        }
    }
}

/// An auxiliary ConfigMap mounted into the agent container
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfigMapsSpec {
    /// Name of the ConfigMap in the resource's namespace
    pub name: String,
    /// Sub-path below `/var/conf`
    #[serde(default)]
    pub mount_path: String,
}
