// handlers/public/exchange.rs - POST /api/exchange/validate-binance

use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::{json, Value};

use crate::services::exchange::{ExchangeCredentials, ExchangeError};
use crate::AppState;

/// POST /api/exchange/validate-binance - Check API credentials against the
/// exchange's signed account endpoint.
///
/// Responds `{ "success": true }` on any 2xx from the exchange; otherwise
/// `{ "success": false, "error": "..." }` carrying the upstream status.
pub async fn validate_binance(
    State(state): State<AppState>,
    Json(credentials): Json<ExchangeCredentials>,
) -> (StatusCode, Json<Value>) {
    match state.exchange.validate_credentials(&credentials).await {
        Ok(()) => (StatusCode::OK, Json(json!({ "success": true }))),
        Err(err) => {
            let status = match &err {
                ExchangeError::InvalidApiKey => StatusCode::UNAUTHORIZED,
                ExchangeError::AccessDenied => StatusCode::FORBIDDEN,
                ExchangeError::UnsupportedExchange(_) => StatusCode::BAD_REQUEST,
                ExchangeError::Upstream { status, .. } => StatusCode::from_u16(*status)
                    .unwrap_or(StatusCode::BAD_GATEWAY),
                ExchangeError::Transport(e) => {
                    tracing::error!("Exchange request failed: {}", e);
                    StatusCode::INTERNAL_SERVER_ERROR
                }
                ExchangeError::Signature => StatusCode::INTERNAL_SERVER_ERROR,
            };
            let message = match &err {
                ExchangeError::Transport(_) | ExchangeError::Signature => {
                    "Internal server error".to_string()
                }
                other => other.to_string(),
            };
            (
                status,
                Json(json!({ "success": false, "error": message })),
            )
        }
    }
}
