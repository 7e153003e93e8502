// handlers/protected/currencies.rs - /api/currencies CRUD (global reference data)

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{response::Json, Extension};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::{Currency, PublicUser};
use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCurrency {
    pub code: String,
    pub name: String,
    pub symbol: String,
    pub exchange_rate: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCurrency {
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub exchange_rate: Option<f64>,
    pub version: Option<i64>,
}

/// GET /api/currencies - All currencies (global, not user-scoped)
pub async fn list(
    State(state): State<AppState>,
    Extension(_user): Extension<PublicUser>,
) -> Result<Json<Vec<Currency>>, ApiError> {
    let rows: Vec<Currency> = sqlx::query_as("SELECT * FROM currencies ORDER BY code")
        .fetch_all(&state.pool)
        .await?;
    Ok(Json(rows))
}

/// POST /api/currencies - Add a currency; codes are unique
pub async fn create(
    State(state): State<AppState>,
    Extension(_user): Extension<PublicUser>,
    Json(payload): Json<CreateCurrency>,
) -> Result<(StatusCode, Json<Currency>), ApiError> {
    let currency = Currency {
        id: Uuid::new_v4().to_string(),
        code: payload.code,
        name: payload.name,
        symbol: payload.symbol,
        exchange_rate: payload.exchange_rate,
        version: 1,
    };

    // Unique-constraint violations map to a 400 via the sqlx conversion
    sqlx::query(
        "INSERT INTO currencies (id, code, name, symbol, exchange_rate, version)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&currency.id)
    .bind(&currency.code)
    .bind(&currency.name)
    .bind(&currency.symbol)
    .bind(currency.exchange_rate)
    .bind(currency.version)
    .execute(&state.pool)
    .await?;

    Ok((StatusCode::CREATED, Json(currency)))
}

/// PUT /api/currencies/:id - Update name/symbol/rate (code is immutable)
pub async fn update(
    State(state): State<AppState>,
    Extension(_user): Extension<PublicUser>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateCurrency>,
) -> Result<Json<Currency>, ApiError> {
    let mut tx = state.pool.begin().await?;

    let existing: Option<Currency> = sqlx::query_as("SELECT * FROM currencies WHERE id = ?")
        .bind(&id)
        .fetch_optional(&mut *tx)
        .await?;
    let mut row = existing.ok_or_else(|| ApiError::not_found("Currency not found"))?;

    if let Some(expected) = payload.version {
        if expected != row.version {
            return Err(ApiError::conflict("Currency was modified concurrently"));
        }
    }

    if let Some(name) = payload.name {
        row.name = name;
    }
    if let Some(symbol) = payload.symbol {
        row.symbol = symbol;
    }
    if let Some(rate) = payload.exchange_rate {
        row.exchange_rate = rate;
    }
    row.version += 1;

    sqlx::query(
        "UPDATE currencies SET name = ?, symbol = ?, exchange_rate = ?, version = ? WHERE id = ?",
    )
    .bind(&row.name)
    .bind(&row.symbol)
    .bind(row.exchange_rate)
    .bind(row.version)
    .bind(&row.id)
    .execute(&mut *tx)
    .await?;
    tx.commit().await?;

    Ok(Json(row))
}

/// DELETE /api/currencies/:id - Idempotent delete
pub async fn remove(
    State(state): State<AppState>,
    Extension(_user): Extension<PublicUser>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    sqlx::query("DELETE FROM currencies WHERE id = ?")
        .bind(&id)
        .execute(&state.pool)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
