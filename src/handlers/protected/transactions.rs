// handlers/protected/transactions.rs - /api/transactions CRUD

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{response::Json, Extension};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::{PublicUser, Transaction, TransactionType};
use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct TransactionFilter {
    #[serde(rename = "type")]
    pub transaction_type: Option<TransactionType>,
    pub category: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransaction {
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub amount: f64,
    pub category: String,
    pub date: String,
    pub currency: Option<String>,
    pub description: Option<String>,
    pub entity: Option<String>,
    pub tax_amount: Option<f64>,
    pub tax_rate: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTransaction {
    #[serde(rename = "type")]
    pub transaction_type: Option<TransactionType>,
    pub amount: Option<f64>,
    pub category: Option<String>,
    pub date: Option<String>,
    pub currency: Option<String>,
    pub description: Option<String>,
    pub entity: Option<String>,
    pub tax_amount: Option<f64>,
    pub tax_rate: Option<f64>,
    /// Optimistic concurrency check; omit to skip
    pub version: Option<i64>,
}

/// GET /api/transactions - List the caller's transactions, newest first.
/// Optional filters: type, category, from, to (inclusive date bounds).
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<PublicUser>,
    Query(filter): Query<TransactionFilter>,
) -> Result<Json<Vec<Transaction>>, ApiError> {
    let mut qb =
        sqlx::QueryBuilder::<sqlx::Sqlite>::new("SELECT * FROM transactions WHERE user_id = ");
    qb.push_bind(&user.id);
    if let Some(t) = &filter.transaction_type {
        qb.push(" AND type = ").push_bind(t);
    }
    if let Some(category) = &filter.category {
        qb.push(" AND category = ").push_bind(category);
    }
    if let Some(from) = &filter.from {
        qb.push(" AND date >= ").push_bind(from);
    }
    if let Some(to) = &filter.to {
        qb.push(" AND date <= ").push_bind(to);
    }
    qb.push(" ORDER BY date DESC, created_at DESC");

    let rows = qb.build_query_as().fetch_all(&state.pool).await?;
    Ok(Json(rows))
}

/// POST /api/transactions - Create a transaction. The category must exist
/// in the caller's visible tier and match the transaction type.
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<PublicUser>,
    Json(payload): Json<CreateTransaction>,
) -> Result<(StatusCode, Json<Transaction>), ApiError> {
    validate_category(&state.pool, &user.id, &payload.category, payload.transaction_type).await?;

    let transaction = Transaction {
        id: Uuid::new_v4().to_string(),
        user_id: user.id,
        transaction_type: payload.transaction_type,
        amount: payload.amount,
        currency: payload.currency.unwrap_or_else(|| "EUR".to_string()),
        category: payload.category,
        description: payload.description.unwrap_or_default(),
        date: payload.date,
        entity: payload.entity,
        tax_amount: payload.tax_amount,
        tax_rate: payload.tax_rate,
        version: 1,
        created_at: chrono::Utc::now().to_rfc3339(),
    };

    sqlx::query(
        "INSERT INTO transactions
         (id, user_id, amount, description, category, date, type, currency, entity, tax_amount, tax_rate, version, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&transaction.id)
    .bind(&transaction.user_id)
    .bind(transaction.amount)
    .bind(&transaction.description)
    .bind(&transaction.category)
    .bind(&transaction.date)
    .bind(transaction.transaction_type)
    .bind(&transaction.currency)
    .bind(&transaction.entity)
    .bind(transaction.tax_amount)
    .bind(transaction.tax_rate)
    .bind(transaction.version)
    .bind(&transaction.created_at)
    .execute(&state.pool)
    .await?;

    Ok((StatusCode::CREATED, Json(transaction)))
}

/// PUT /api/transactions/:id - Partial update. A stale `version` in the
/// payload is rejected with 409; omitting it keeps last-write-wins.
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<PublicUser>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateTransaction>,
) -> Result<Json<Transaction>, ApiError> {
    let mut tx = state.pool.begin().await?;

    let existing: Option<Transaction> =
        sqlx::query_as("SELECT * FROM transactions WHERE id = ? AND user_id = ?")
            .bind(&id)
            .bind(&user.id)
            .fetch_optional(&mut *tx)
            .await?;
    let mut row = existing.ok_or_else(|| ApiError::not_found("Transaction not found"))?;

    if let Some(expected) = payload.version {
        if expected != row.version {
            return Err(ApiError::conflict("Transaction was modified concurrently"));
        }
    }

    if let Some(t) = payload.transaction_type {
        row.transaction_type = t;
    }
    if let Some(amount) = payload.amount {
        row.amount = amount;
    }
    if let Some(category) = payload.category {
        row.category = category;
    }
    if let Some(date) = payload.date {
        row.date = date;
    }
    if let Some(currency) = payload.currency {
        row.currency = currency;
    }
    if let Some(description) = payload.description {
        row.description = description;
    }
    if let Some(entity) = payload.entity {
        row.entity = Some(entity);
    }
    if let Some(tax_amount) = payload.tax_amount {
        row.tax_amount = Some(tax_amount);
    }
    if let Some(tax_rate) = payload.tax_rate {
        row.tax_rate = Some(tax_rate);
    }

    validate_category(&mut *tx, &user.id, &row.category, row.transaction_type).await?;
    row.version += 1;

    sqlx::query(
        "UPDATE transactions SET amount = ?, description = ?, category = ?, date = ?, type = ?,
         currency = ?, entity = ?, tax_amount = ?, tax_rate = ?, version = ?
         WHERE id = ? AND user_id = ?",
    )
    .bind(row.amount)
    .bind(&row.description)
    .bind(&row.category)
    .bind(&row.date)
    .bind(row.transaction_type)
    .bind(&row.currency)
    .bind(&row.entity)
    .bind(row.tax_amount)
    .bind(row.tax_rate)
    .bind(row.version)
    .bind(&row.id)
    .bind(&user.id)
    .execute(&mut *tx)
    .await?;
    tx.commit().await?;

    Ok(Json(row))
}

/// DELETE /api/transactions/:id - Idempotent: deleting an absent id is a
/// no-op, not an error.
pub async fn remove(
    State(state): State<AppState>,
    Extension(user): Extension<PublicUser>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    sqlx::query("DELETE FROM transactions WHERE id = ? AND user_id = ?")
        .bind(&id)
        .bind(&user.id)
        .execute(&state.pool)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// The category must exist (user or global tier) with the same income/expense
/// type as the transaction.
async fn validate_category<'e, E>(
    executor: E,
    user_id: &str,
    category: &str,
    transaction_type: TransactionType,
) -> Result<(), ApiError>
where
    E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
{
    let (count,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM categories
         WHERE name = ? AND type = ? AND (user_id = ? OR user_id IS NULL)",
    )
    .bind(category)
    .bind(transaction_type)
    .bind(user_id)
    .fetch_one(executor)
    .await?;

    if count == 0 {
        return Err(ApiError::bad_request(
            "Category does not exist for this transaction type",
        ));
    }
    Ok(())
}
