// handlers/protected/settings.rs - /api/settings (theme + base currency)

use axum::extract::State;
use axum::{response::Json, Extension};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::models::PublicUser;
use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    pub theme: String,
    pub base_currency: String,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            theme: "light".to_string(),
            base_currency: "EUR".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettings {
    pub theme: Option<String>,
    pub base_currency: Option<String>,
}

/// GET /api/settings - The caller's theme and base currency
pub async fn get_settings(
    State(state): State<AppState>,
    Extension(user): Extension<PublicUser>,
) -> Result<Json<UserSettings>, ApiError> {
    let settings = fetch_settings(&state, &user.id).await?;
    Ok(Json(settings))
}

/// PUT /api/settings - Update theme and/or base currency. The base currency
/// must exist in the currency table (one base currency per user).
pub async fn update_settings(
    State(state): State<AppState>,
    Extension(user): Extension<PublicUser>,
    Json(payload): Json<UpdateSettings>,
) -> Result<Json<UserSettings>, ApiError> {
    let mut settings = fetch_settings(&state, &user.id).await?;

    if let Some(theme) = payload.theme {
        if theme != "light" && theme != "dark" {
            return Err(ApiError::bad_request("Theme must be 'light' or 'dark'"));
        }
        settings.theme = theme;
    }
    if let Some(code) = payload.base_currency {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM currencies WHERE code = ?")
            .bind(&code)
            .fetch_one(&state.pool)
            .await?;
        if count == 0 {
            return Err(ApiError::bad_request("Unknown currency code"));
        }
        settings.base_currency = code;
    }

    sqlx::query(
        "INSERT INTO user_settings (user_id, theme, base_currency) VALUES (?, ?, ?)
         ON CONFLICT(user_id) DO UPDATE SET theme = excluded.theme, base_currency = excluded.base_currency",
    )
    .bind(&user.id)
    .bind(&settings.theme)
    .bind(&settings.base_currency)
    .execute(&state.pool)
    .await?;

    Ok(Json(settings))
}

pub(crate) async fn fetch_settings(
    state: &AppState,
    user_id: &str,
) -> Result<UserSettings, ApiError> {
    let settings: Option<UserSettings> =
        sqlx::query_as("SELECT theme, base_currency FROM user_settings WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(&state.pool)
            .await?;
    Ok(settings.unwrap_or_default())
}
