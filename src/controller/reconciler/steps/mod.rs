//! # Convergence Steps
//!
//! One step per owned object kind, plus the final status update. Order is
//! significant: later steps reference objects created by earlier ones (the
//! workloads mount the ConfigMap and run as the ServiceAccount).

mod config_maps;
mod service_accounts;
mod services;
mod status;
mod workloads;

pub use config_maps::ConfigMaps;
pub use service_accounts::ServiceAccounts;
pub use services::Services;
pub use status::{desired_status, SelfStatus, WorkloadReadiness};
pub use workloads::{DaemonSets, Deployments};

use std::fmt::Debug;

use k8s_openapi::NamespaceResourceScope;
use kube::api::{DeleteParams, Patch, PatchParams};
use kube::{Resource, ResourceExt};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use crate::constants::FIELD_MANAGER;
use crate::controller::reconciler::error::TaskError;
use crate::controller::reconciler::pipeline::Task;
use crate::controller::reconciler::types::Params;

/// The default steps, in dependency order
#[must_use]
pub fn default_tasks() -> Vec<Task<Params>> {
    vec![
        Task::new("config maps", true, ConfigMaps),
        Task::new("service accounts", true, ServiceAccounts),
        Task::new("services", true, Services),
        Task::new("deployments", true, Deployments),
        Task::new("daemon sets", true, DaemonSets),
        Task::new("amazon-cloudwatch-agent", true, SelfStatus),
    ]
}

/// Server-side apply `desired` in the instance's namespace
pub(crate) async fn apply<K>(params: &Params, desired: &K) -> Result<K, TaskError>
where
    K: Resource<Scope = NamespaceResourceScope> + Clone + Debug + Serialize + DeserializeOwned,
    K::DynamicType: Default,
{
    let name = desired.name_any();
    let applied = params
        .api::<K>()
        .patch(
            &name,
            &PatchParams::apply(FIELD_MANAGER).force(),
            &Patch::Apply(desired),
        )
        .await?;
    debug!(
        kind = %K::kind(&K::DynamicType::default()),
        name = %name,
        "applied desired state"
    );
    Ok(applied)
}

/// Delete `name` if it exists and is controlled by the instance
///
/// Objects with the same name that the instance does not own are left alone.
pub(crate) async fn delete_owned<K>(params: &Params, name: &str) -> Result<(), TaskError>
where
    K: Resource<Scope = NamespaceResourceScope> + Clone + Debug + DeserializeOwned,
    K::DynamicType: Default,
{
    let api = params.api::<K>();
    let Some(existing) = api.get_opt(name).await? else {
        return Ok(());
    };

    let uid = params.instance.uid();
    let owned = existing
        .owner_references()
        .iter()
        .any(|owner| owner.controller == Some(true) && Some(&owner.uid) == uid.as_ref());
    if !owned {
        return Ok(());
    }

    match api.delete(name, &DeleteParams::default()).await {
        Ok(_) => {
            info!(
                kind = %K::kind(&K::DynamicType::default()),
                name = %name,
                "deleted object no longer wanted"
            );
            Ok(())
        }
        Err(kube::Error::Api(e)) if e.code == 404 => Ok(()),
        Err(e) => Err(e.into()),
    }
}
