use alloy::eips::BlockNumberOrTag;
use alloy::primitives::{Address, B256};
use alloy::rpc::types::{Filter, Log};
use async_trait::async_trait;
use bigdecimal::BigDecimal;
use std::sync::Arc;

use crate::datasource::chain::{
    involves, pad_address, rescale, transfer_amount, transfer_topic, ChainClient,
};
use crate::datasource::{SourceStats, StatsSource};
use crate::error::SourceResult;
use crate::identity::AccountId;

/// Block range covered by a log scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScanRange {
    pub from_block: u64,
    /// Window size for chunked scans; `None` issues a single unbounded query.
    pub chunk: Option<u64>,
}

/// Volume and trade count derived from ERC-20 `Transfer` logs of one contract.
pub struct TransferLogSource {
    name: String,
    client: Arc<dyn ChainClient>,
    contract: Address,
    decimals: u32,
    range: ScanRange,
}

impl TransferLogSource {
    pub fn new(
        name: &str,
        client: Arc<dyn ChainClient>,
        contract: Address,
        decimals: u32,
        range: ScanRange,
    ) -> Self {
        if range.chunk.is_none() {
            tracing::warn!(
                "{}: log scan from block {} to latest is unbounded, set LOG_BLOCK_CHUNK to page it",
                name,
                range.from_block
            );
        }

        Self {
            name: name.to_string(),
            client,
            contract,
            decimals,
            range,
        }
    }

    fn filter(&self, from_block: BlockNumberOrTag, to_block: BlockNumberOrTag) -> Filter {
        Filter::new()
            .address(self.contract)
            .event_signature(transfer_topic())
            .from_block(from_block)
            .to_block(to_block)
    }

    async fn collect_logs(&self) -> SourceResult<Vec<Log>> {
        let Some(chunk) = self.range.chunk else {
            let from = match self.range.from_block {
                0 => BlockNumberOrTag::Earliest,
                n => BlockNumberOrTag::Number(n),
            };
            return self
                .client
                .get_past_logs(&self.filter(from, BlockNumberOrTag::Latest))
                .await;
        };

        let head = self.client.block_number().await?;
        let windows = block_windows(self.range.from_block, head, chunk);
        tracing::debug!(
            "{}: scanning blocks {}..={} in {} windows",
            self.name,
            self.range.from_block,
            head,
            windows.len()
        );

        let mut logs = Vec::new();
        for (start, end) in windows {
            let batch = self
                .client
                .get_past_logs(&self.filter(
                    BlockNumberOrTag::Number(start),
                    BlockNumberOrTag::Number(end),
                ))
                .await?;
            logs.extend(batch);
        }
        Ok(logs)
    }

    async fn try_fetch(&self, account: &AccountId) -> SourceResult<SourceStats> {
        let logs = self.collect_logs().await?;
        tracing::info!("{}: fetched {} transfer logs", self.name, logs.len());
        tally(&logs, &pad_address(account.address()), self.decimals)
    }
}

#[async_trait]
impl StatsSource for TransferLogSource {
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

/// Sums the rescaled amounts of every record that involves `account_topic`.
pub fn tally(records: &[Log], account_topic: &B256, decimals: u32) -> SourceResult<SourceStats> {
    let mut volume = BigDecimal::from(0);
    let mut trades = 0u64;

    for record in records.iter().filter(|r| involves(r, account_topic)) {
        tracing::trace!(
            "Matched transfer on {} at block {:?}, tx {:?}",
            record.address(),
            record.block_number,
            record.transaction_hash
        );
        volume += rescale(transfer_amount(record)?, decimals)?;
        trades += 1;
    }

    Ok(SourceStats::new(volume, trades))
}

/// Splits `from..=head` into consecutive inclusive windows of at most `chunk` blocks.
pub fn block_windows(from: u64, head: u64, chunk: u64) -> Vec<(u64, u64)> {
    let mut windows = Vec::new();
    if chunk == 0 {
        return windows;
    }

    let mut start = from;
    while start <= head {
        let end = start.saturating_add(chunk - 1).min(head);
        windows.push((start, end));
        if end == u64::MAX {
            break;
        }
        start = end + 1;
    }
    windows
}
