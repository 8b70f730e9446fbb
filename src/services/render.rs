use bigdecimal::RoundingMode;
use serde::Deserialize;

use crate::services::aggregator::AggregatedStats;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Text,
}

/// Plain-text stats card, one block per source.
pub fn render_text(stats: &AggregatedStats) -> String {
    let mut out = String::from("User Stats:\n");

    for (exchange, data) in stats {
        let volume = data.volume.with_scale_round(2, RoundingMode::HalfEven);
        out.push_str(&format!(
            "{}:\n  Volume: ${}\n  Trades: {}\n",
            exchange.to_uppercase(),
            volume,
            data.trades
        ));
    }

    out
}
