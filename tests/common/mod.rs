// Each integration test binary compiles its own copy of this module and
// uses a different subset of the helpers.
#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use financiall::services::exchange::ExchangeService;
use financiall::{app, database, AppState};

/// Fresh app over an isolated in-memory database. One connection so every
/// test sees a single consistent database.
pub async fn test_app() -> Router {
    app(test_state().await)
}

pub async fn test_state() -> AppState {
    AppState::new(test_pool().await)
}

/// Same as `test_app` but with the exchange service pointed at a mock host
pub async fn test_app_with_exchange(base_url: &str) -> Router {
    let pool = test_pool().await;
    app(AppState::with_exchange(pool, ExchangeService::with_base_url(base_url)))
}

async fn test_pool() -> sqlx::SqlitePool {
    let pool = database::manager::connect_to("sqlite::memory:", 1)
        .await
        .expect("in-memory pool");
    database::manager::init_schema(&pool).await.expect("schema");
    database::seed::seed_global_defaults(&pool).await.expect("seed");
    pool
}

/// Issue a request against the in-process router and decode the JSON body
/// (Null for empty bodies).
pub async fn send(
    app: &Router,
    method: &str,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    let request = match body {
        Some(value) => builder
            .header("content-type", "application/json")
            .body(Body::from(value.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    };

    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

/// Register a user and return (token, user_id)
pub async fn register_user(app: &Router, name: &str, email: &str) -> (String, String) {
    let (status, body) = send(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "name": name, "email": email, "password": "secret123" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
    let token = body["token"].as_str().expect("token").to_string();
    let user_id = body["user"]["id"].as_str().expect("user id").to_string();
    (token, user_id)
}
