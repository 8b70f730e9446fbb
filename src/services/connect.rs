use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

use crate::error::AppResult;
use crate::identity::{resolve, AccountId, WalletProvider};
use crate::services::aggregator::{AggregatedStats, StatsAggregator};

#[derive(Debug, Clone, Serialize)]
pub struct StatsReport {
    pub address: AccountId,
    pub stats: AggregatedStats,
    pub generated_at: DateTime<Utc>,
}

pub struct ConnectService {
    aggregator: Arc<StatsAggregator>,
}

impl ConnectService {
    pub fn new(aggregator: Arc<StatsAggregator>) -> Self {
        Self { aggregator }
    }

    /// Requests wallet access, resolves the active account and aggregates its stats.
    ///
    /// Fails only when the wallet cannot be reached or exposes no account.
    pub async fn connect(&self, provider: &dyn WalletProvider) -> AppResult<StatsReport> {
        provider.request_accounts().await?;

        let address = resolve(provider).await?;
        tracing::info!("Connected wallet: {}", address);

        Ok(self.report(address).await)
    }

    /// Aggregates stats for an already known account.
    pub async fn report(&self, address: AccountId) -> StatsReport {
        let stats = self.aggregator.aggregate(&address).await;
        StatsReport {
            address,
            stats,
            generated_at: Utc::now(),
        }
    }
}
