use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("No wallet account available")]
    NoAccount,

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Wallet error: {0}")]
    WalletError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::NoAccount => (
                StatusCode::NOT_FOUND,
                "Failed to connect wallet. Please try again.".to_string(),
            ),
            AppError::InvalidAddress(addr) => {
                (StatusCode::BAD_REQUEST, format!("Invalid address: {}", addr))
            }
            AppError::WalletError(msg) => {
                tracing::error!("Wallet error: {}", msg);
                (StatusCode::BAD_GATEWAY, "Wallet request failed".to_string())
            }
            AppError::ConfigError(msg) => {
                tracing::error!("Configuration error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone())
            }
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// Failure inside a single stats source. Never leaves the source that raised it.
#[derive(Debug, thiserror::Error)]
pub enum SourceFetchError {
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Node error: {0}")]
    Rpc(#[from] alloy::transports::TransportError),

    #[error("Unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Schema mismatch: {0}")]
    Schema(String),

    #[error("Timed out after {0:?}")]
    Timeout(std::time::Duration),
}

impl From<serde_json::Error> for SourceFetchError {
    fn from(err: serde_json::Error) -> Self {
        SourceFetchError::Decode(err.to_string())
    }
}

pub type SourceResult<T> = Result<T, SourceFetchError>;
