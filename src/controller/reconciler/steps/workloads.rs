//! Deployment and DaemonSet steps. Each applies its workload when the mode
//! selects it and removes a stale one left behind by a mode switch otherwise.

use async_trait::async_trait;
use k8s_openapi::api::apps::v1::{DaemonSet, Deployment};
use kube::ResourceExt;

use crate::controller::manifests::{naming, workload};
use crate::controller::reconciler::error::TaskError;
use crate::controller::reconciler::pipeline::TaskAction;
use crate::controller::reconciler::steps::{apply, delete_owned};
use crate::controller::reconciler::types::Params;

#[derive(Debug, Clone, Copy, Default)]
pub struct Deployments;

#[async_trait]
impl TaskAction<Params> for Deployments {
    async fn run(&self, params: &Params) -> Result<(), TaskError> {
        match workload::deployment(&params.config, &params.instance) {
            Some(desired) => {
                apply(params, &desired).await?;
            }
            None => {
                delete_owned::<Deployment>(params, &naming::workload(&params.instance.name_any()))
                    .await?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DaemonSets;

#[async_trait]
impl TaskAction<Params> for DaemonSets {
    async fn run(&self, params: &Params) -> Result<(), TaskError> {
        match workload::daemon_set(&params.config, &params.instance) {
            Some(desired) => {
                apply(params, &desired).await?;
            }
            None => {
                delete_owned::<DaemonSet>(params, &naming::workload(&params.instance.name_any()))
                    .await?;
            }
        }
        Ok(())
    }
}
