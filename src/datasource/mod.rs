pub mod chain;
pub mod dydx;

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use serde::Serialize;

use crate::identity::AccountId;

/// Aggregated activity of one account on one source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SourceStats {
    pub volume: BigDecimal,
    pub trades: u64,
}

impl SourceStats {
    /// Builds stats with `volume` in its shortest plain form (`150.5`, `5`, `1200`).
    pub fn new(volume: BigDecimal, trades: u64) -> Self {
        let volume = volume.normalized();
        let volume = if volume.as_bigint_and_exponent().1 < 0 {
            volume.with_scale(0)
        } else {
            volume
        };
        Self { volume, trades }
    }
}

/// A named source of trading stats.
///
/// `fetch` never fails: any error is logged and replaced by `SourceStats::default()`.
#[async_trait]
pub trait StatsSource: Send + Sync {
    /// Fixed key under which this source's stats are reported
    fn name(&self) -> &str;

    async fn fetch(&self, account: &AccountId) -> SourceStats;
}
