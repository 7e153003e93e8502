// handlers/protected/export.rs - GET /api/export and POST /api/import

use axum::extract::State;
use axum::http::StatusCode;
use axum::{response::Json, Extension};
use serde::{Deserialize, Serialize};

use crate::database::models::{Category, Entity, Investment, PublicUser, TaxConfig, Transaction};
use crate::error::ApiError;
use crate::AppState;

/// Portable snapshot of a user's data. Only user-owned reference rows are
/// included; the global tier is re-created by any target instance.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDataExport {
    pub transactions: Vec<Transaction>,
    pub investments: Vec<Investment>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub entities: Vec<Entity>,
    #[serde(default)]
    pub tax_configs: Vec<TaxConfig>,
}

/// GET /api/export - Dump the caller's data as a JSON blob
pub async fn export_data(
    State(state): State<AppState>,
    Extension(user): Extension<PublicUser>,
) -> Result<Json<UserDataExport>, ApiError> {
    let transactions = sqlx::query_as("SELECT * FROM transactions WHERE user_id = ?")
        .bind(&user.id)
        .fetch_all(&state.pool)
        .await?;
    let investments = sqlx::query_as("SELECT * FROM investments WHERE user_id = ?")
        .bind(&user.id)
        .fetch_all(&state.pool)
        .await?;
    let categories = sqlx::query_as("SELECT * FROM categories WHERE user_id = ?")
        .bind(&user.id)
        .fetch_all(&state.pool)
        .await?;
    let entities = sqlx::query_as("SELECT * FROM entities WHERE user_id = ?")
        .bind(&user.id)
        .fetch_all(&state.pool)
        .await?;
    let tax_configs = sqlx::query_as("SELECT * FROM tax_configs WHERE user_id = ?")
        .bind(&user.id)
        .fetch_all(&state.pool)
        .await?;

    Ok(Json(UserDataExport {
        transactions,
        investments,
        categories,
        entities,
        tax_configs,
    }))
}

/// POST /api/import - Re-import an exported blob into the caller's account.
/// Rows keep their ids (round-trip is content-equal); rows whose id already
/// exists are skipped, so importing twice is a no-op. Everything is owned by
/// the caller regardless of the userId recorded in the blob.
pub async fn import_data(
    State(state): State<AppState>,
    Extension(user): Extension<PublicUser>,
    Json(payload): Json<UserDataExport>,
) -> Result<StatusCode, ApiError> {
    let mut tx = state.pool.begin().await?;

    for t in &payload.transactions {
        sqlx::query(
            "INSERT OR IGNORE INTO transactions
             (id, user_id, amount, description, category, date, type, currency, entity, tax_amount, tax_rate, version, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&t.id)
        .bind(&user.id)
        .bind(t.amount)
        .bind(&t.description)
        .bind(&t.category)
        .bind(&t.date)
        .bind(t.transaction_type)
        .bind(&t.currency)
        .bind(&t.entity)
        .bind(t.tax_amount)
        .bind(t.tax_rate)
        .bind(t.version)
        .bind(&t.created_at)
        .execute(&mut *tx)
        .await?;
    }

    for i in &payload.investments {
        sqlx::query(
            "INSERT OR IGNORE INTO investments
             (id, user_id, symbol, name, quantity, purchase_price, current_price, purchase_date, type, currency, entity, version, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&i.id)
        .bind(&user.id)
        .bind(&i.symbol)
        .bind(&i.name)
        .bind(i.quantity)
        .bind(i.purchase_price)
        .bind(i.current_price)
        .bind(&i.purchase_date)
        .bind(i.investment_type)
        .bind(&i.currency)
        .bind(&i.entity)
        .bind(i.version)
        .bind(&i.created_at)
        .execute(&mut *tx)
        .await?;
    }

    for c in &payload.categories {
        sqlx::query(
            "INSERT OR IGNORE INTO categories (id, user_id, name, type, color, icon, version, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&c.id)
        .bind(&user.id)
        .bind(&c.name)
        .bind(c.category_type)
        .bind(&c.color)
        .bind(&c.icon)
        .bind(c.version)
        .bind(&c.created_at)
        .execute(&mut *tx)
        .await?;
    }

    for e in &payload.entities {
        sqlx::query(
            "INSERT OR IGNORE INTO entities (id, user_id, name, type, color, version, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&e.id)
        .bind(&user.id)
        .bind(&e.name)
        .bind(e.entity_type)
        .bind(&e.color)
        .bind(e.version)
        .bind(&e.created_at)
        .execute(&mut *tx)
        .await?;
    }

    for tc in &payload.tax_configs {
        sqlx::query(
            "INSERT OR IGNORE INTO tax_configs (id, user_id, name, rate, country, is_default, version, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&tc.id)
        .bind(&user.id)
        .bind(&tc.name)
        .bind(tc.rate)
        .bind(&tc.country)
        .bind(tc.is_default)
        .bind(tc.version)
        .bind(&tc.created_at)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(StatusCode::NO_CONTENT)
}
