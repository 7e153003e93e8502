// handlers/protected/tax_configs.rs - /api/tax-configs CRUD

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{response::Json, Extension};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::{PublicUser, TaxConfig};
use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaxConfig {
    pub name: String,
    pub rate: f64,
    pub country: String,
    #[serde(default)]
    pub is_default: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaxConfig {
    pub name: Option<String>,
    pub rate: Option<f64>,
    pub country: Option<String>,
    pub is_default: Option<bool>,
    pub version: Option<i64>,
}

/// GET /api/tax-configs - List the caller's tax configurations
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<PublicUser>,
) -> Result<Json<Vec<TaxConfig>>, ApiError> {
    let rows: Vec<TaxConfig> =
        sqlx::query_as("SELECT * FROM tax_configs WHERE user_id = ? ORDER BY name")
            .bind(&user.id)
            .fetch_all(&state.pool)
            .await?;
    Ok(Json(rows))
}

/// POST /api/tax-configs - Create a tax configuration. Marking it default
/// clears the flag on the user's other rows in the same transaction.
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<PublicUser>,
    Json(payload): Json<CreateTaxConfig>,
) -> Result<(StatusCode, Json<TaxConfig>), ApiError> {
    let config = TaxConfig {
        id: Uuid::new_v4().to_string(),
        user_id: user.id,
        name: payload.name,
        rate: payload.rate,
        country: payload.country,
        is_default: payload.is_default,
        version: 1,
        created_at: chrono::Utc::now().to_rfc3339(),
    };

    let mut tx = state.pool.begin().await?;
    if config.is_default {
        sqlx::query("UPDATE tax_configs SET is_default = FALSE WHERE user_id = ?")
            .bind(&config.user_id)
            .execute(&mut *tx)
            .await?;
    }
    sqlx::query(
        "INSERT INTO tax_configs (id, user_id, name, rate, country, is_default, version, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&config.id)
    .bind(&config.user_id)
    .bind(&config.name)
    .bind(config.rate)
    .bind(&config.country)
    .bind(config.is_default)
    .bind(config.version)
    .bind(&config.created_at)
    .execute(&mut *tx)
    .await?;
    tx.commit().await?;

    Ok((StatusCode::CREATED, Json(config)))
}

/// PUT /api/tax-configs/:id - Partial update; keeps at most one default row
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<PublicUser>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateTaxConfig>,
) -> Result<Json<TaxConfig>, ApiError> {
    let mut tx = state.pool.begin().await?;

    let existing: Option<TaxConfig> =
        sqlx::query_as("SELECT * FROM tax_configs WHERE id = ? AND user_id = ?")
            .bind(&id)
            .bind(&user.id)
            .fetch_optional(&mut *tx)
            .await?;
    let mut row = existing.ok_or_else(|| ApiError::not_found("Tax config not found"))?;

    if let Some(expected) = payload.version {
        if expected != row.version {
            return Err(ApiError::conflict("Tax config was modified concurrently"));
        }
    }

    if let Some(name) = payload.name {
        row.name = name;
    }
    if let Some(rate) = payload.rate {
        row.rate = rate;
    }
    if let Some(country) = payload.country {
        row.country = country;
    }
    if let Some(is_default) = payload.is_default {
        row.is_default = is_default;
    }
    row.version += 1;

    if row.is_default {
        sqlx::query("UPDATE tax_configs SET is_default = FALSE WHERE user_id = ? AND id != ?")
            .bind(&user.id)
            .bind(&row.id)
            .execute(&mut *tx)
            .await?;
    }

    sqlx::query(
        "UPDATE tax_configs SET name = ?, rate = ?, country = ?, is_default = ?, version = ?
         WHERE id = ? AND user_id = ?",
    )
    .bind(&row.name)
    .bind(row.rate)
    .bind(&row.country)
    .bind(row.is_default)
    .bind(row.version)
    .bind(&row.id)
    .bind(&user.id)
    .execute(&mut *tx)
    .await?;
    tx.commit().await?;

    Ok(Json(row))
}

/// DELETE /api/tax-configs/:id - Idempotent delete
pub async fn remove(
    State(state): State<AppState>,
    Extension(user): Extension<PublicUser>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    sqlx::query("DELETE FROM tax_configs WHERE id = ? AND user_id = ?")
        .bind(&id)
        .bind(&user.id)
        .execute(&state.pool)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
