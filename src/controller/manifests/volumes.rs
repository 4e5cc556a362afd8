//! # Volumes and Mounts
//!
//! Mount points for the primary configuration and auxiliary ConfigMaps, and
//! the matching pod volumes.

use k8s_openapi::api::core::v1::{ConfigMapVolumeSource, KeyToPath, Volume, VolumeMount};

use crate::constants::{CONFIG_MAP_VOLUME, CONFIG_MOUNT_PATH, EXTRA_CONFIG_BASE_PATH};
use crate::controller::manifests::naming;
use crate::crd::AmazonCloudWatchAgentSpec;

/// Plan the container's volume mounts
///
/// Order: primary configuration (when `add_config`), declared mounts as
/// written, then one mount per auxiliary ConfigMap in declared order.
#[must_use]
pub fn plan_volume_mounts(spec: &AmazonCloudWatchAgentSpec, add_config: bool) -> Vec<VolumeMount> {
    let mut mounts =
        Vec::with_capacity(usize::from(add_config) + spec.volume_mounts.len() + spec.config_maps.len());

    if add_config {
        mounts.push(VolumeMount {
            name: CONFIG_MAP_VOLUME.to_string(),
            mount_path: CONFIG_MOUNT_PATH.to_string(),
            ..Default::default()
        });
    }

    mounts.extend_from_slice(&spec.volume_mounts);

    for bundle in &spec.config_maps {
        let volume = naming::config_map_extra(&bundle.name);
        mounts.push(VolumeMount {
            mount_path: join_clean(&[EXTRA_CONFIG_BASE_PATH, &bundle.mount_path, &volume]),
            name: volume,
            ..Default::default()
        });
    }

    mounts
}

/// Pod volumes backing the planned mounts (except user mounts of user volumes,
/// which are appended verbatim)
#[must_use]
pub fn volumes(
    config_map_name: &str,
    config_map_entry: &str,
    spec: &AmazonCloudWatchAgentSpec,
) -> Vec<Volume> {
    let mut volumes = Vec::with_capacity(1 + spec.config_maps.len() + spec.volumes.len());
    volumes.push(Volume {
        name: CONFIG_MAP_VOLUME.to_string(),
        config_map: Some(ConfigMapVolumeSource {
            name: config_map_name.to_string(),
            items: Some(vec![KeyToPath {
                key: config_map_entry.to_string(),
                path: config_map_entry.to_string(),
                ..Default::default()
            }]),
            ..Default::default()
        }),
        ..Default::default()
    });

    for bundle in &spec.config_maps {
        volumes.push(Volume {
            name: naming::config_map_extra(&bundle.name),
            config_map: Some(ConfigMapVolumeSource {
                name: bundle.name.clone(),
                ..Default::default()
            }),
            ..Default::default()
        });
    }

    volumes.extend_from_slice(&spec.volumes);
    volumes
}

/// Join path fragments into a clean absolute path
///
/// Empty and `.` segments vanish, `..` removes the previous segment and
/// never climbs above `/`.
#[must_use]
pub fn join_clean(parts: &[&str]) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for part in parts {
        for segment in part.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    segments.pop();
                }
                s => segments.push(s),
            }
        }
    }
    format!("/{}", segments.join("/"))
}
