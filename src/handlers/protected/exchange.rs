// handlers/protected/exchange.rs - POST /api/exchange/sync

use axum::extract::State;
use axum::http::StatusCode;
use axum::{response::Json, Extension};
use uuid::Uuid;

use crate::database::models::{Investment, InvestmentType, PublicUser};
use crate::error::ApiError;
use crate::services::exchange::ExchangeCredentials;
use crate::AppState;

/// Exchange positions settle into this currency when materialized as
/// investments, matching the original behavior.
const SETTLEMENT_CURRENCY: &str = "EUR";

/// POST /api/exchange/sync - Fetch exchange balances and create one crypto
/// investment per nonzero position. Credentials arrive in the body and are
/// never persisted. The purchase price is the current market price; a true
/// cost basis would need trade-history ingestion.
pub async fn sync(
    State(state): State<AppState>,
    Extension(user): Extension<PublicUser>,
    Json(credentials): Json<ExchangeCredentials>,
) -> Result<(StatusCode, Json<Vec<Investment>>), ApiError> {
    let positions = state.exchange.sync_positions(&credentials).await?;

    let today = chrono::Utc::now().format("%Y-%m-%d").to_string();
    let now = chrono::Utc::now().to_rfc3339();
    let mut created = Vec::with_capacity(positions.len());

    for position in positions {
        if position.quantity <= 0.0 {
            continue;
        }
        let investment = Investment {
            id: Uuid::new_v4().to_string(),
            user_id: user.id.clone(),
            investment_type: InvestmentType::Crypto,
            symbol: position.symbol,
            name: format!("{} ({})", position.asset, credentials.name),
            quantity: position.quantity,
            purchase_price: position.average_price,
            current_price: position.current_price,
            currency: SETTLEMENT_CURRENCY.to_string(),
            purchase_date: today.clone(),
            entity: None,
            version: 1,
            created_at: now.clone(),
        };
        super::investments::insert_investment(&state, &investment).await?;
        created.push(investment);
    }

    tracing::info!(
        "Synced {} exchange positions for user {}",
        created.len(),
        user.id
    );
    Ok((StatusCode::CREATED, Json(created)))
}
