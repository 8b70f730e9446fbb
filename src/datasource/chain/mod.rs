pub mod node_client;
pub mod transfer_source;

pub use node_client::NodeClient;
pub use transfer_source::{ScanRange, TransferLogSource};

use alloy::primitives::{keccak256, Address, B256, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::{Filter, Log};
use async_trait::async_trait;
use bigdecimal::BigDecimal;
use reqwest::Url;
use std::str::FromStr;

use crate::error::{AppError, AppResult, SourceFetchError, SourceResult};

pub const TRANSFER_SIGNATURE: &str = "Transfer(address,address,uint256)";

/// Read access to a blockchain node.
#[async_trait]
pub trait ChainClient: Send + Sync {
    async fn get_past_logs(&self, filter: &Filter) -> SourceResult<Vec<Log>>;

    async fn block_number(&self) -> SourceResult<u64>;
}

/// Type-erased alloy HTTP provider for `url`.
pub fn http_provider(url: &str) -> AppResult<DynProvider> {
    let url: Url = url
        .parse()
        .map_err(|e| AppError::ConfigError(format!("invalid RPC url '{}': {}", url, e)))?;
    Ok(ProviderBuilder::new().connect_http(url).erased())
}

pub fn hash_event_signature(signature: &str) -> B256 {
    keccak256(signature.as_bytes())
}

pub fn transfer_topic() -> B256 {
    hash_event_signature(TRANSFER_SIGNATURE)
}

/// Left-pads an address to topic width.
pub fn pad_address(address: Address) -> B256 {
    address.into_word()
}

/// True when `topic` sits in the sender or receiver slot of `log`.
pub fn involves(log: &Log, topic: &B256) -> bool {
    let topics = log.topics();
    topics.get(1) == Some(topic) || topics.get(2) == Some(topic)
}

/// Reads the log payload as a single big-endian uint256.
pub fn transfer_amount(log: &Log) -> SourceResult<U256> {
    let data = &log.data().data;
    if data.is_empty() {
        return Err(SourceFetchError::Decode(
            "log payload is empty".to_string(),
        ));
    }
    U256::try_from_be_slice(data).ok_or_else(|| {
        SourceFetchError::Decode(format!(
            "log payload is {} bytes, expected at most 32",
            data.len()
        ))
    })
}

/// Converts a base-unit amount into a decimal with `decimals` fractional digits.
pub fn rescale(raw: U256, decimals: u32) -> SourceResult<BigDecimal> {
    let value = BigDecimal::from_str(&format!("{}e-{}", raw, decimals))
        .map_err(|e| SourceFetchError::Decode(format!("cannot rescale {}: {}", raw, e)))?;
    Ok(value.normalized())
}
