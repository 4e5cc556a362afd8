//! # Labels
//!
//! Common labels applied to every object the operator owns.

use std::collections::BTreeMap;

use kube::ResourceExt;

use crate::constants::MAX_DNS_LABEL_LEN;
use crate::controller::manifests::naming;
use crate::crd::AmazonCloudWatchAgent;

const MANAGED_BY: &str = "amazon-cloudwatch-agent-operator";
const PART_OF: &str = "amazon-cloudwatch-agent";
const COMPONENT: &str = "amazon-cloudwatch-agent";

/// Full label set for an owned object
///
/// User labels on the resource are copied first; operator labels win on conflict.
#[must_use]
pub fn labels(instance: &AmazonCloudWatchAgent, image: &str) -> BTreeMap<String, String> {
    let mut labels = instance.labels().clone();
    labels.extend(selector_labels(instance));
    labels.insert(
        "app.kubernetes.io/name".to_string(),
        naming::truncate(&instance.name_any(), MAX_DNS_LABEL_LEN),
    );
    labels.insert(
        "app.kubernetes.io/version".to_string(),
        naming::truncate(image_tag(image), MAX_DNS_LABEL_LEN),
    );
    labels
}

/// Stable subset used for pod selectors
///
/// Must never include anything that changes over the object's lifetime,
/// selectors on Deployments and DaemonSets are immutable.
#[must_use]
pub fn selector_labels(instance: &AmazonCloudWatchAgent) -> BTreeMap<String, String> {
    BTreeMap::from([
        (
            "app.kubernetes.io/managed-by".to_string(),
            MANAGED_BY.to_string(),
        ),
        (
            "app.kubernetes.io/instance".to_string(),
            naming::truncate(
                &format!(
                    "{}.{}",
                    instance.namespace().unwrap_or_default(),
                    instance.name_any()
                ),
                MAX_DNS_LABEL_LEN,
            ),
        ),
        ("app.kubernetes.io/part-of".to_string(), PART_OF.to_string()),
        (
            "app.kubernetes.io/component".to_string(),
            COMPONENT.to_string(),
        ),
    ])
}

/// Tag portion of an image reference, `latest` when there is none
///
/// A colon that belongs to a registry host (`host:5000/agent`) is not a tag.
#[must_use]
pub fn image_tag(image: &str) -> &str {
    let image = image.split('@').next().unwrap_or(image);
    match image.rsplit_once(':') {
        Some((_, tag)) if !tag.contains('/') && !tag.is_empty() => tag,
        _ => "latest",
    }
}
