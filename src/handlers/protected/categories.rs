// handlers/protected/categories.rs - /api/categories CRUD (two-tier scope)

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{response::Json, Extension};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::{merge_scoped, Category, CategoryType, PublicUser};
use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateCategory {
    pub name: String,
    #[serde(rename = "type")]
    pub category_type: CategoryType,
    pub color: String,
    pub icon: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCategory {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub category_type: Option<CategoryType>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub version: Option<i64>,
}

/// GET /api/categories - The caller's visible categories: their own rows
/// merged with the global tier, user rows shadowing globals of the same
/// name and type.
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<PublicUser>,
) -> Result<Json<Vec<Category>>, ApiError> {
    let rows: Vec<Category> = sqlx::query_as(
        "SELECT * FROM categories WHERE user_id = ? OR user_id IS NULL ORDER BY name",
    )
    .bind(&user.id)
    .fetch_all(&state.pool)
    .await?;
    Ok(Json(merge_scoped(rows)))
}

/// POST /api/categories - Create a user-owned category
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<PublicUser>,
    Json(payload): Json<CreateCategory>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    let category = Category {
        id: Uuid::new_v4().to_string(),
        user_id: Some(user.id),
        name: payload.name,
        category_type: payload.category_type,
        color: payload.color,
        icon: payload.icon,
        version: 1,
        created_at: chrono::Utc::now().to_rfc3339(),
    };

    sqlx::query(
        "INSERT INTO categories (id, user_id, name, type, color, icon, version, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&category.id)
    .bind(&category.user_id)
    .bind(&category.name)
    .bind(category.category_type)
    .bind(&category.color)
    .bind(&category.icon)
    .bind(category.version)
    .bind(&category.created_at)
    .execute(&state.pool)
    .await?;

    Ok((StatusCode::CREATED, Json(category)))
}

/// PUT /api/categories/:id - Update a user-owned category. The global tier
/// is read-only through the API; shadow it by creating a user row instead.
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<PublicUser>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateCategory>,
) -> Result<Json<Category>, ApiError> {
    let mut tx = state.pool.begin().await?;

    let existing: Option<Category> =
        sqlx::query_as("SELECT * FROM categories WHERE id = ? AND user_id = ?")
            .bind(&id)
            .bind(&user.id)
            .fetch_optional(&mut *tx)
            .await?;
    let mut row = existing.ok_or_else(|| ApiError::not_found("Category not found"))?;

    if let Some(expected) = payload.version {
        if expected != row.version {
            return Err(ApiError::conflict("Category was modified concurrently"));
        }
    }

    if let Some(name) = payload.name {
        row.name = name;
    }
    if let Some(t) = payload.category_type {
        row.category_type = t;
    }
    if let Some(color) = payload.color {
        row.color = color;
    }
    if let Some(icon) = payload.icon {
        row.icon = icon;
    }
    row.version += 1;

    sqlx::query(
        "UPDATE categories SET name = ?, type = ?, color = ?, icon = ?, version = ?
         WHERE id = ? AND user_id = ?",
    )
    .bind(&row.name)
    .bind(row.category_type)
    .bind(&row.color)
    .bind(&row.icon)
    .bind(row.version)
    .bind(&row.id)
    .bind(&user.id)
    .execute(&mut *tx)
    .await?;
    tx.commit().await?;

    Ok(Json(row))
}

/// DELETE /api/categories/:id - Idempotent; global rows are not deletable
/// and are treated as absent.
pub async fn remove(
    State(state): State<AppState>,
    Extension(user): Extension<PublicUser>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    sqlx::query("DELETE FROM categories WHERE id = ? AND user_id = ?")
        .bind(&id)
        .bind(&user.id)
        .execute(&state.pool)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
