use axum::{
    extract::{Query, State},
    response::Response,
};
use serde::Deserialize;

use crate::error::AppResult;
use crate::handlers::respond;
use crate::services::render::OutputFormat;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    #[serde(default)]
    pub format: OutputFormat,
}

pub async fn post_connect(
    State(state): State<AppState>,
    Query(query): Query<ConnectQuery>,
) -> AppResult<Response> {
    let report = state.connect_service.connect(state.wallet.as_ref()).await?;

    Ok(respond(report, query.format))
}
