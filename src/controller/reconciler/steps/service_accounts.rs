use async_trait::async_trait;
use tracing::debug;

use crate::controller::manifests::objects;
use crate::controller::reconciler::error::TaskError;
use crate::controller::reconciler::pipeline::TaskAction;
use crate::controller::reconciler::steps::apply;
use crate::controller::reconciler::types::Params;

/// Applies the agent's ServiceAccount unless the resource names its own
#[derive(Debug, Clone, Copy, Default)]
pub struct ServiceAccounts;

#[async_trait]
impl TaskAction<Params> for ServiceAccounts {
    async fn run(&self, params: &Params) -> Result<(), TaskError> {
        match objects::service_account(&params.config, &params.instance) {
            Some(desired) => {
                apply(params, &desired).await?;
            }
            None => debug!(
                service_account = %objects::service_account_name(&params.instance),
                "using existing service account"
            ),
        }
        Ok(())
    }
}
