use axum::{
    extract::{Query, State},
    response::Response,
};
use serde::Deserialize;

use crate::error::AppResult;
use crate::handlers::respond;
use crate::identity::{resolve, StaticWalletProvider};
use crate::services::render::OutputFormat;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    #[serde(default)]
    pub wallet: Option<String>,
    #[serde(default)]
    pub format: OutputFormat,
}

pub async fn get_stats(
    State(state): State<AppState>,
    Query(query): Query<StatsQuery>,
) -> AppResult<Response> {
    let provider = StaticWalletProvider::new(query.wallet);
    let address = resolve(&provider).await?;

    let report = state.connect_service.report(address).await;

    Ok(respond(report, query.format))
}
