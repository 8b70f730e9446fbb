use futures_util::future::join_all;
use indexmap::IndexMap;
use std::sync::Arc;
use std::time::Duration;

use crate::datasource::{SourceStats, StatsSource};
use crate::error::SourceFetchError;
use crate::identity::AccountId;

/// Stats per source name, in source registration order.
pub type AggregatedStats = IndexMap<String, SourceStats>;

pub struct StatsAggregator {
    sources: Vec<Arc<dyn StatsSource>>,
    timeout: Duration,
}

impl StatsAggregator {
    pub fn new(sources: Vec<Arc<dyn StatsSource>>, timeout: Duration) -> Self {
        Self { sources, timeout }
    }

    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Runs every source concurrently. Always yields one entry per source;
    /// a source that times out reports zero stats.
    pub async fn aggregate(&self, account: &AccountId) -> AggregatedStats {
        tracing::info!("Fetching stats for wallet: {}", account);

        let results = join_all(self.sources.iter().map(|source| async move {
            match tokio::time::timeout(self.timeout, source.fetch(account)).await {
                Ok(stats) => stats,
                Err(_) => {
                    tracing::warn!(
                        "Error fetching {} stats: {}",
                        source.name(),
                        SourceFetchError::Timeout(self.timeout)
                    );
                    SourceStats::default()
                }
            }
        }))
        .await;

        let stats: AggregatedStats = self
            .sources
            .iter()
            .zip(results)
            .map(|(source, stats)| (source.name().to_string(), stats))
            .collect();

        tracing::debug!("Combined stats: {:?}", stats);
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bigdecimal::BigDecimal;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const ACCOUNT: &str = "0x1111111111111111111111111111111111111111";

    struct FixedSource {
        name: &'static str,
        stats: SourceStats,
        delay: Duration,
        calls: AtomicUsize,
    }

    impl FixedSource {
        fn new(name: &'static str, volume: i64, trades: u64) -> Arc<Self> {
            Arc::new(Self {
                name,
                stats: SourceStats {
                    volume: BigDecimal::from(volume),
                    trades,
                },
                delay: Duration::ZERO,
                calls: AtomicUsize::new(0),
            })
        }

        fn slow(name: &'static str) -> Arc<Self> {
            Arc::new(Self {
                name,
                stats: SourceStats {
                    volume: BigDecimal::from(1),
                    trades: 1,
                },
                delay: Duration::from_secs(3600),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl StatsSource for FixedSource {
        fn name(&self) -> &str {
            self.name
        }

        async fn fetch(&self, _account: &AccountId) -> SourceStats {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            self.stats.clone()
        }
    }

    fn account() -> AccountId {
        AccountId::parse(ACCOUNT).unwrap()
    }

    #[tokio::test]
    async fn keys_follow_source_order() {
        let aggregator = StatsAggregator::new(
            vec![
                FixedSource::new("hyperliquid", 5, 1),
                FixedSource::new("dydx", 150, 5),
            ],
            Duration::from_secs(5),
        );

        let stats = aggregator.aggregate(&account()).await;

        let keys: Vec<&str> = stats.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["hyperliquid", "dydx"]);
        assert_eq!(stats["dydx"].trades, 5);
        assert_eq!(stats["hyperliquid"].volume, BigDecimal::from(5));
    }

    #[tokio::test(start_paused = true)]
    async fn timed_out_source_reports_zero() {
        let slow = FixedSource::slow("hyperliquid");
        let aggregator = StatsAggregator::new(
            vec![slow.clone(), FixedSource::new("dydx", 10, 2)],
            Duration::from_secs(30),
        );

        let stats = aggregator.aggregate(&account()).await;

        assert_eq!(stats.len(), 2);
        assert_eq!(stats["hyperliquid"], SourceStats::default());
        assert_eq!(stats["dydx"].trades, 2);
        assert_eq!(slow.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn repeated_runs_are_identical() {
        let aggregator = StatsAggregator::new(
            vec![
                FixedSource::new("hyperliquid", 5, 1),
                FixedSource::new("dydx", 150, 5),
            ],
            Duration::from_secs(5),
        );

        let first = serde_json::to_vec(&aggregator.aggregate(&account()).await).unwrap();
        let second = serde_json::to_vec(&aggregator.aggregate(&account()).await).unwrap();
        assert_eq!(first, second);
    }
}
