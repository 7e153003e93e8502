// handlers/protected/investments.rs - /api/investments CRUD

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{response::Json, Extension};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::{Investment, InvestmentType, PublicUser};
use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvestment {
    #[serde(rename = "type")]
    pub investment_type: InvestmentType,
    pub symbol: String,
    pub name: String,
    pub quantity: f64,
    pub purchase_price: f64,
    pub current_price: f64,
    pub purchase_date: String,
    pub currency: Option<String>,
    pub entity: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInvestment {
    #[serde(rename = "type")]
    pub investment_type: Option<InvestmentType>,
    pub symbol: Option<String>,
    pub name: Option<String>,
    pub quantity: Option<f64>,
    pub purchase_price: Option<f64>,
    pub current_price: Option<f64>,
    pub purchase_date: Option<String>,
    pub currency: Option<String>,
    pub entity: Option<String>,
    pub version: Option<i64>,
}

/// GET /api/investments - List the caller's investments, newest first
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<PublicUser>,
) -> Result<Json<Vec<Investment>>, ApiError> {
    let rows: Vec<Investment> = sqlx::query_as(
        "SELECT * FROM investments WHERE user_id = ? ORDER BY purchase_date DESC, created_at DESC",
    )
    .bind(&user.id)
    .fetch_all(&state.pool)
    .await?;
    Ok(Json(rows))
}

/// POST /api/investments - Create an investment position
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<PublicUser>,
    Json(payload): Json<CreateInvestment>,
) -> Result<(StatusCode, Json<Investment>), ApiError> {
    let investment = Investment {
        id: Uuid::new_v4().to_string(),
        user_id: user.id,
        investment_type: payload.investment_type,
        symbol: payload.symbol,
        name: payload.name,
        quantity: payload.quantity,
        purchase_price: payload.purchase_price,
        current_price: payload.current_price,
        currency: payload.currency.unwrap_or_else(|| "EUR".to_string()),
        purchase_date: payload.purchase_date,
        entity: payload.entity,
        version: 1,
        created_at: chrono::Utc::now().to_rfc3339(),
    };

    insert_investment(&state, &investment).await?;
    Ok((StatusCode::CREATED, Json(investment)))
}

/// PUT /api/investments/:id - Partial update with optional version check
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<PublicUser>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateInvestment>,
) -> Result<Json<Investment>, ApiError> {
    let mut tx = state.pool.begin().await?;

    let existing: Option<Investment> =
        sqlx::query_as("SELECT * FROM investments WHERE id = ? AND user_id = ?")
            .bind(&id)
            .bind(&user.id)
            .fetch_optional(&mut *tx)
            .await?;
    let mut row = existing.ok_or_else(|| ApiError::not_found("Investment not found"))?;

    if let Some(expected) = payload.version {
        if expected != row.version {
            return Err(ApiError::conflict("Investment was modified concurrently"));
        }
    }

    if let Some(t) = payload.investment_type {
        row.investment_type = t;
    }
    if let Some(symbol) = payload.symbol {
        row.symbol = symbol;
    }
    if let Some(name) = payload.name {
        row.name = name;
    }
    if let Some(quantity) = payload.quantity {
        row.quantity = quantity;
    }
    if let Some(purchase_price) = payload.purchase_price {
        row.purchase_price = purchase_price;
    }
    if let Some(current_price) = payload.current_price {
        row.current_price = current_price;
    }
    if let Some(purchase_date) = payload.purchase_date {
        row.purchase_date = purchase_date;
    }
    if let Some(currency) = payload.currency {
        row.currency = currency;
    }
    if let Some(entity) = payload.entity {
        row.entity = Some(entity);
    }
    row.version += 1;

    sqlx::query(
        "UPDATE investments SET symbol = ?, name = ?, quantity = ?, purchase_price = ?,
         current_price = ?, purchase_date = ?, type = ?, currency = ?, entity = ?, version = ?
         WHERE id = ? AND user_id = ?",
    )
    .bind(&row.symbol)
    .bind(&row.name)
    .bind(row.quantity)
    .bind(row.purchase_price)
    .bind(row.current_price)
    .bind(&row.purchase_date)
    .bind(row.investment_type)
    .bind(&row.currency)
    .bind(&row.entity)
    .bind(row.version)
    .bind(&row.id)
    .bind(&user.id)
    .execute(&mut *tx)
    .await?;
    tx.commit().await?;

    Ok(Json(row))
}

/// DELETE /api/investments/:id - Idempotent delete
pub async fn remove(
    State(state): State<AppState>,
    Extension(user): Extension<PublicUser>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    sqlx::query("DELETE FROM investments WHERE id = ? AND user_id = ?")
        .bind(&id)
        .bind(&user.id)
        .execute(&state.pool)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn insert_investment(
    state: &AppState,
    investment: &Investment,
) -> Result<(), ApiError> {
    sqlx::query(
        "INSERT INTO investments
         (id, user_id, symbol, name, quantity, purchase_price, current_price, purchase_date, type, currency, entity, version, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&investment.id)
    .bind(&investment.user_id)
    .bind(&investment.symbol)
    .bind(&investment.name)
    .bind(investment.quantity)
    .bind(investment.purchase_price)
    .bind(investment.current_price)
    .bind(&investment.purchase_date)
    .bind(investment.investment_type)
    .bind(&investment.currency)
    .bind(&investment.entity)
    .bind(investment.version)
    .bind(&investment.created_at)
    .execute(&state.pool)
    .await?;
    Ok(())
}
