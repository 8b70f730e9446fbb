pub mod account_source;
pub mod accounts_client;

pub use account_source::AccountStatsSource;
pub use accounts_client::DydxAccountsClient;

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use serde::Deserialize;
use serde_json::{Map, Number, Value};
use std::str::FromStr;

use crate::error::{SourceFetchError, SourceResult};
use crate::identity::AccountId;

/// Body of `GET /v3/accounts/{address}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountsResponse {
    #[serde(default)]
    pub accounts: Vec<AccountRecord>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRecord {
    #[serde(default)]
    pub open_positions: Option<OpenPositions>,
    #[serde(default)]
    pub collateral: Option<Amount>,
}

/// Either a plain count or the market-keyed position map the live API returns.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OpenPositions {
    Count(u64),
    Markets(Map<String, Value>),
}

impl OpenPositions {
    pub fn count(&self) -> u64 {
        match self {
            OpenPositions::Count(n) => *n,
            OpenPositions::Markets(markets) => markets.len() as u64,
        }
    }
}

/// Numeric field sent either as a JSON number or a decimal string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Number(Number),
    Text(String),
}

impl Amount {
    pub fn to_decimal(&self) -> SourceResult<BigDecimal> {
        let raw = match self {
            Amount::Number(n) => n.to_string(),
            Amount::Text(s) => s.trim().to_string(),
        };
        BigDecimal::from_str(&raw)
            .map_err(|e| SourceFetchError::Schema(format!("collateral '{}': {}", raw, e)))
    }
}

/// Read access to the exchange's account endpoint.
#[async_trait]
pub trait AccountsApi: Send + Sync {
    async fn get_accounts(&self, account: &AccountId) -> SourceResult<AccountsResponse>;
}
