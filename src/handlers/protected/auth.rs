// handlers/protected/auth.rs - GET /api/auth/verify

use axum::{response::Json, Extension};
use serde_json::{json, Value};

use crate::database::models::PublicUser;

/// GET /api/auth/verify - Return the user resolved from the bearer token.
/// The auth middleware has already validated the token and re-fetched the
/// user row; a stale token for a deleted user never reaches this handler.
pub async fn verify(Extension(user): Extension<PublicUser>) -> Json<Value> {
    Json(json!({ "user": user }))
}
