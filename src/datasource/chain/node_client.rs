use alloy::providers::{DynProvider, Provider};
use alloy::rpc::types::{Filter, Log};
use async_trait::async_trait;

use crate::datasource::chain::{http_provider, ChainClient};
use crate::error::{AppResult, SourceResult};

/// Blockchain node reached through an alloy HTTP provider.
pub struct NodeClient {
    provider: DynProvider,
    rpc_url: String,
}

impl NodeClient {
    pub fn connect(rpc_url: &str) -> AppResult<Self> {
        Ok(Self {
            provider: http_provider(rpc_url)?,
            rpc_url: rpc_url.to_string(),
        })
    }
}

#[async_trait]
impl ChainClient for NodeClient {
    async fn get_past_logs(&self, filter: &Filter) -> SourceResult<Vec<Log>> {
        let logs = self.provider.get_logs(filter).await?;
        tracing::debug!("eth_getLogs on {} returned {} records", self.rpc_url, logs.len());
        Ok(logs)
    }

    async fn block_number(&self) -> SourceResult<u64> {
        Ok(self.provider.get_block_number().await?)
    }
}
