// handlers/protected/entities.rs - /api/entities CRUD (two-tier scope)

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{response::Json, Extension};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::{merge_scoped, Entity, EntityType, PublicUser};
use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateEntity {
    pub name: String,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    pub color: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateEntity {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub entity_type: Option<EntityType>,
    pub color: Option<String>,
    pub version: Option<i64>,
}

/// GET /api/entities - User rows merged with the global tier (shadowed by name)
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<PublicUser>,
) -> Result<Json<Vec<Entity>>, ApiError> {
    let rows: Vec<Entity> = sqlx::query_as(
        "SELECT * FROM entities WHERE user_id = ? OR user_id IS NULL ORDER BY name",
    )
    .bind(&user.id)
    .fetch_all(&state.pool)
    .await?;
    Ok(Json(merge_scoped(rows)))
}

/// POST /api/entities - Create a user-owned financial entity
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<PublicUser>,
    Json(payload): Json<CreateEntity>,
) -> Result<(StatusCode, Json<Entity>), ApiError> {
    let entity = Entity {
        id: Uuid::new_v4().to_string(),
        user_id: Some(user.id),
        name: payload.name,
        entity_type: payload.entity_type,
        color: payload.color,
        version: 1,
        created_at: chrono::Utc::now().to_rfc3339(),
    };

    sqlx::query(
        "INSERT INTO entities (id, user_id, name, type, color, version, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&entity.id)
    .bind(&entity.user_id)
    .bind(&entity.name)
    .bind(entity.entity_type)
    .bind(&entity.color)
    .bind(entity.version)
    .bind(&entity.created_at)
    .execute(&state.pool)
    .await?;

    Ok((StatusCode::CREATED, Json(entity)))
}

/// PUT /api/entities/:id - Update a user-owned entity; global tier is
/// read-only through the API.
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<PublicUser>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateEntity>,
) -> Result<Json<Entity>, ApiError> {
    let mut tx = state.pool.begin().await?;

    let existing: Option<Entity> =
        sqlx::query_as("SELECT * FROM entities WHERE id = ? AND user_id = ?")
            .bind(&id)
            .bind(&user.id)
            .fetch_optional(&mut *tx)
            .await?;
    let mut row = existing.ok_or_else(|| ApiError::not_found("Entity not found"))?;

    if let Some(expected) = payload.version {
        if expected != row.version {
            return Err(ApiError::conflict("Entity was modified concurrently"));
        }
    }

    if let Some(name) = payload.name {
        row.name = name;
    }
    if let Some(t) = payload.entity_type {
        row.entity_type = t;
    }
    if let Some(color) = payload.color {
        row.color = color;
    }
    row.version += 1;

    sqlx::query(
        "UPDATE entities SET name = ?, type = ?, color = ?, version = ?
         WHERE id = ? AND user_id = ?",
    )
    .bind(&row.name)
    .bind(row.entity_type)
    .bind(&row.color)
    .bind(row.version)
    .bind(&row.id)
    .bind(&user.id)
    .execute(&mut *tx)
    .await?;
    tx.commit().await?;

    Ok(Json(row))
}

/// DELETE /api/entities/:id - Idempotent delete of a user-owned entity
pub async fn remove(
    State(state): State<AppState>,
    Extension(user): Extension<PublicUser>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    sqlx::query("DELETE FROM entities WHERE id = ? AND user_id = ?")
        .bind(&id)
        .bind(&user.id)
        .execute(&state.pool)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
