//! # Container Environment
//!
//! Declared variables first, then the pod identity, then proxy settings.

use k8s_openapi::api::core::v1::{EnvVar, EnvVarSource, ObjectFieldSelector};

use crate::constants::POD_NAME_ENV;

/// Compose the container environment
///
/// `proxy_env` is the operator's proxy snapshot (see `ControllerConfig::proxy_env`);
/// each entry is emitted twice, upper-case then lower-case, since tools disagree
/// on which spelling they read.
#[must_use]
pub fn compose_env(declared: &[EnvVar], proxy_env: &[(String, String)]) -> Vec<EnvVar> {
    let mut env = Vec::with_capacity(declared.len() + 1 + proxy_env.len() * 2);
    env.extend_from_slice(declared);
    env.push(pod_name_env());
    env.extend(proxy_env_vars(proxy_env));
    env
}

/// `POD_NAME`, resolved by the kubelet from `metadata.name`
#[must_use]
pub fn pod_name_env() -> EnvVar {
    EnvVar {
        name: POD_NAME_ENV.to_string(),
        value_from: Some(EnvVarSource {
            field_ref: Some(ObjectFieldSelector {
                field_path: "metadata.name".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn proxy_env_vars(proxy_env: &[(String, String)]) -> impl Iterator<Item = EnvVar> + '_ {
    proxy_env.iter().flat_map(|(name, value)| {
        [
            EnvVar {
                name: name.to_uppercase(),
                value: Some(value.clone()),
                ..Default::default()
            },
            EnvVar {
                name: name.to_lowercase(),
                value: Some(value.clone()),
                ..Default::default()
            },
        ]
    })
}
