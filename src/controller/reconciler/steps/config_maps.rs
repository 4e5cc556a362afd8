use async_trait::async_trait;

use crate::controller::manifests::objects;
use crate::controller::reconciler::error::TaskError;
use crate::controller::reconciler::pipeline::TaskAction;
use crate::controller::reconciler::steps::apply;
use crate::controller::reconciler::types::Params;

/// Applies the ConfigMap holding the agent configuration
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigMaps;

#[async_trait]
impl TaskAction<Params> for ConfigMaps {
    async fn run(&self, params: &Params) -> Result<(), TaskError> {
        let desired = objects::config_map(&params.config, &params.instance);
        apply(params, &desired).await?;
        Ok(())
    }
}
