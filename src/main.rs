use axum::http::{header, Method};
use reqwest::Client;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod datasource;
mod error;
mod handlers;
mod identity;
mod services;
#[cfg(test)]
mod test_support;

use config::{Config, DydxMode};
use error::AppResult;
use datasource::chain::{ChainClient, NodeClient, ScanRange, TransferLogSource};
use datasource::dydx::{AccountStatsSource, DydxAccountsClient};
use datasource::StatsSource;
use identity::{RpcWalletProvider, WalletProvider};
use services::aggregator::StatsAggregator;
use services::connect::ConnectService;

#[derive(Clone)]
pub struct AppState {
    pub connect_service: Arc<ConnectService>,
    pub wallet: Arc<dyn WalletProvider>,
}

/// Sources in reporting order: hyperliquid first, then dydx.
fn build_sources(config: &Config, client: &Client) -> AppResult<Vec<Arc<dyn StatsSource>>> {
    let node: Arc<dyn ChainClient> = Arc::new(NodeClient::connect(&config.rpc_url)?);
    let range = ScanRange {
        from_block: config.log_from_block,
        chunk: config.log_block_chunk,
    };

    let hyperliquid: Arc<dyn StatsSource> = Arc::new(TransferLogSource::new(
        "hyperliquid",
        node.clone(),
        config.hyperliquid_contract,
        config.token_decimals,
        range,
    ));

    let dydx: Arc<dyn StatsSource> = match config.dydx_mode {
        DydxMode::Api => Arc::new(AccountStatsSource::new(
            "dydx",
            Arc::new(DydxAccountsClient::new(client.clone(), &config.dydx_api_url)),
        )),
        DydxMode::OnChain => Arc::new(TransferLogSource::new(
            "dydx",
            node,
            config.dydx_contract,
            config.token_decimals,
            range,
        )),
    };

    Ok(vec![hyperliquid, dydx])
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trader_stats=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from environment
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    let client = Client::new();

    // Initialize sources and services
    let sources = build_sources(&config, &client)?;
    let aggregator = Arc::new(StatsAggregator::new(sources, config.source_timeout));
    tracing::info!(
        "Reporting sources {:?} with a {:?} timeout each",
        aggregator.source_names(),
        config.source_timeout
    );

    let state = AppState {
        connect_service: Arc::new(ConnectService::new(aggregator)),
        wallet: Arc::new(RpcWalletProvider::connect(&config.wallet_rpc_url)?),
    };

    // Build CORS layer
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    let app = handlers::router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = format!("{}:{}", config.server_host, config.server_port);
    tracing::info!("Starting stats API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sources_report_in_fixed_order() {
        let config = Config::from_lookup(|_| None).unwrap();
        let sources = build_sources(&config, &Client::new()).unwrap();
        let names: Vec<&str> = sources.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["hyperliquid", "dydx"]);

        let config = Config::from_lookup(|key| {
            (key == "DYDX_MODE").then(|| "onchain".to_string())
        })
        .unwrap();
        let sources = build_sources(&config, &Client::new()).unwrap();
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[1].name(), "dydx");
    }
}
