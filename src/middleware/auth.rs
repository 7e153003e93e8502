use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::auth::validate_jwt;
use crate::database::models::PublicUser;
use crate::error::ApiError;
use crate::AppState;

/// JWT authentication middleware. Validates the bearer token, re-fetches the
/// user row (a deleted user invalidates outstanding tokens), and attaches the
/// public user fields to the request for downstream handlers.
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&headers)?;
    let claims = validate_jwt(&token)?;

    let user: Option<PublicUser> =
        sqlx::query_as("SELECT id, name, email FROM users WHERE id = ?")
            .bind(&claims.user_id)
            .fetch_optional(&state.pool)
            .await?;

    let user = user.ok_or_else(|| ApiError::unauthorized("User not found"))?;
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

/// Extract the JWT from the Authorization header
fn extract_bearer_token(headers: &HeaderMap) -> Result<String, ApiError> {
    let auth_header = headers
        .get("authorization")
        .ok_or_else(|| ApiError::unauthorized("Access token required"))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| ApiError::unauthorized("Invalid Authorization header"))?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.to_string()),
        _ => Err(ApiError::unauthorized("Access token required")),
    }
}
