use async_trait::async_trait;
use k8s_openapi::api::core::v1::Service;
use kube::ResourceExt;

use crate::controller::manifests::{naming, objects};
use crate::controller::reconciler::error::TaskError;
use crate::controller::reconciler::pipeline::TaskAction;
use crate::controller::reconciler::steps::{apply, delete_owned};
use crate::controller::reconciler::types::Params;

/// Applies the agent Service, or removes it when no ports remain
#[derive(Debug, Clone, Copy, Default)]
pub struct Services;

#[async_trait]
impl TaskAction<Params> for Services {
    async fn run(&self, params: &Params) -> Result<(), TaskError> {
        match objects::service(&params.config, &params.instance) {
            Some(desired) => {
                apply(params, &desired).await?;
            }
            None => {
                delete_owned::<Service>(params, &naming::service(&params.instance.name_any()))
                    .await?;
            }
        }
        Ok(())
    }
}
