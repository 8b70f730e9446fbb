use async_trait::async_trait;
use bigdecimal::BigDecimal;
use std::sync::Arc;

use crate::datasource::dydx::{AccountRecord, AccountsApi, OpenPositions};
use crate::datasource::{SourceStats, StatsSource};
use crate::error::{SourceFetchError, SourceResult};
use crate::identity::AccountId;

/// Stats read from exchange account records: collateral as volume, open positions as trades.
pub struct AccountStatsSource {
    name: String,
    api: Arc<dyn AccountsApi>,
}

impl AccountStatsSource {
    pub fn new(name: &str, api: Arc<dyn AccountsApi>) -> Self {
        Self {
            name: name.to_string(),
            api,
        }
    }

    async fn try_fetch(&self, account: &AccountId) -> SourceResult<SourceStats> {
        let response = self.api.get_accounts(account).await?;

        if response.accounts.is_empty() {
            tracing::info!("No {} accounts found for wallet: {}", self.name, account);
            return Ok(SourceStats::default());
        }

        tally(&response.accounts)
    }
}

#[async_trait]
impl StatsSource for AccountStatsSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, account: &AccountId) -> SourceStats {
        tracing::info!("Fetching {} stats for wallet: {}", self.name, account);
        match self.try_fetch(account).await {
            Ok(stats) => stats,
            Err(e) => {
                tracing::warn!("Error fetching {} stats: {}", self.name, e);
                SourceStats::default()
            }
        }
    }
}

pub fn tally(accounts: &[AccountRecord]) -> SourceResult<SourceStats> {
    let mut volume = BigDecimal::from(0);
    let mut trades = 0u64;

    for (index, record) in accounts.iter().enumerate() {
        let collateral = record.collateral.as_ref().ok_or_else(|| {
            SourceFetchError::Schema(format!("account {} has no collateral", index))
        })?;
        volume += collateral.to_decimal()?;
        trades += record.open_positions.as_ref().map_or(0, OpenPositions::count);
    }

    Ok(SourceStats::new(volume, trades))
}
