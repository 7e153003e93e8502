// handlers/public/auth.rs - POST /api/auth/register and /api/auth/login

use axum::{extract::State, http::StatusCode, response::Json};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::{generate_jwt, hash_password, verify_password, Claims};
use crate::database::models::{PublicUser, User};
use crate::database::seed;
use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// POST /api/auth/register - Create a user account and issue a JWT
///
/// Validates the payload (all fields required, password >= 6 chars, email
/// unused), hashes the password, and inserts the user row together with the
/// per-user default categories/entities in a single transaction.
///
/// Expected Output (201):
/// ```json
/// { "message": "...", "token": "...", "user": { "id": "...", "name": "...", "email": "..." } }
/// ```
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let (name, email, password) = match (payload.name, payload.email, payload.password) {
        (Some(n), Some(e), Some(p)) if !n.is_empty() && !e.is_empty() && !p.is_empty() => {
            (n, e, p)
        }
        _ => return Err(ApiError::bad_request("All fields are required")),
    };

    if password.chars().count() < 6 {
        return Err(ApiError::bad_request(
            "Password must be at least 6 characters",
        ));
    }

    // The duplicate-email message is deliberately specific here; login keeps
    // a single generic message instead.
    let existing: Option<(String,)> = sqlx::query_as("SELECT id FROM users WHERE email = ?")
        .bind(&email)
        .fetch_optional(&state.pool)
        .await?;
    if existing.is_some() {
        return Err(ApiError::bad_request("This email is already registered"));
    }

    let hashed = hash_password(&password)?;
    let user_id = Uuid::new_v4().to_string();
    let now = chrono::Utc::now().to_rfc3339();

    // User row and seed data commit or roll back together
    let mut tx = state.pool.begin().await?;
    sqlx::query(
        "INSERT INTO users (id, name, email, password, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&user_id)
    .bind(&name)
    .bind(&email)
    .bind(&hashed)
    .bind(&now)
    .bind(&now)
    .execute(&mut *tx)
    .await?;
    seed::seed_user_defaults(&mut tx, &user_id).await?;
    tx.commit().await?;

    let token = generate_jwt(&Claims::new(user_id.clone(), email.clone()))?;
    tracing::info!("Registered user {}", user_id);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User created successfully",
            "token": token,
            "user": { "id": user_id, "name": name, "email": email },
        })),
    ))
}

/// POST /api/auth/login - Authenticate and issue a JWT
///
/// Unknown email and wrong password produce the same 401 message so the
/// endpoint cannot be used to enumerate accounts.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<Value>, ApiError> {
    let (email, password) = match (payload.email, payload.password) {
        (Some(e), Some(p)) if !e.is_empty() && !p.is_empty() => (e, p),
        _ => return Err(ApiError::bad_request("Email and password are required")),
    };

    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE email = ?")
        .bind(&email)
        .fetch_optional(&state.pool)
        .await?;

    let user = match user {
        Some(u) => u,
        None => return Err(ApiError::unauthorized("Incorrect email or password")),
    };

    if !verify_password(&password, &user.password)? {
        return Err(ApiError::unauthorized("Incorrect email or password"));
    }

    let token = generate_jwt(&Claims::new(user.id.clone(), user.email.clone()))?;
    let public = PublicUser::from(user);

    Ok(Json(json!({
        "message": "Login successful",
        "token": token,
        "user": public,
    })))
}
