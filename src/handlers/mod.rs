pub mod connect;
pub mod stats;

use axum::{
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

use crate::services::connect::StatsReport;
use crate::services::render::{render_text, OutputFormat};
use crate::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/stats", get(stats::get_stats))
        .route("/connect", post(connect::post_connect))
        .with_state(state)
}

fn respond(report: StatsReport, format: OutputFormat) -> Response {
    match format {
        OutputFormat::Json => Json(report).into_response(),
        OutputFormat::Text => format!(
            "Connected: {}\n\n{}",
            report.address,
            render_text(&report.stats)
        )
        .into_response(),
    }
}
