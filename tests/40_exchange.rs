// Exchange credential validation and balance sync against a mock listener

mod common;

use std::collections::HashMap;

use axum::extract::Query;
use axum::http::{HeaderMap, StatusCode};
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use serde_json::{json, Value};

const VALID_KEY: &str = "valid-key";

async fn mock_account(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    match headers.get("X-MBX-APIKEY").and_then(|v| v.to_str().ok()) {
        Some(VALID_KEY) => (
            StatusCode::OK,
            Json(json!({
                "balances": [
                    { "asset": "BTC", "free": "0.5", "locked": "0.0" },
                    { "asset": "USDT", "free": "100.0", "locked": "25.0" },
                    { "asset": "ETH", "free": "0.0", "locked": "0.0" },
                ]
            })),
        ),
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "code": -2015, "msg": "Invalid API-key, IP, or permissions for action." })),
        ),
    }
}

async fn mock_ticker(Query(params): Query<HashMap<String, String>>) -> (StatusCode, Json<Value>) {
    match params.get("symbol").map(String::as_str) {
        Some("BTCUSDT") => (StatusCode::OK, Json(json!({ "price": "50000.0" }))),
        _ => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "code": -1121, "msg": "Invalid symbol." })),
        ),
    }
}

async fn spawn_mock_exchange() -> String {
    let router = Router::new()
        .route("/api/v3/account", get(mock_account))
        .route("/api/v3/ticker/price", get(mock_ticker));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock exchange");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("mock exchange");
    });
    format!("http://{}", addr)
}

fn credentials(api_key: &str) -> Value {
    json!({ "apiKey": api_key, "apiSecret": "test-secret" })
}

#[tokio::test(flavor = "multi_thread")]
async fn validate_accepts_working_credentials() {
    let base_url = spawn_mock_exchange().await;
    let app = common::test_app_with_exchange(&base_url).await;

    let (status, body) = common::send(
        &app,
        "POST",
        "/api/exchange/validate-binance",
        None,
        Some(credentials(VALID_KEY)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
}

#[tokio::test(flavor = "multi_thread")]
async fn validate_rejects_bad_credentials() {
    let base_url = spawn_mock_exchange().await;
    let app = common::test_app_with_exchange(&base_url).await;

    let (status, body) = common::send(
        &app,
        "POST",
        "/api/exchange/validate-binance",
        None,
        Some(credentials("wrong-key")),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Invalid API key or insufficient permissions");
}

#[tokio::test(flavor = "multi_thread")]
async fn validate_rejects_unsupported_exchanges() {
    let base_url = spawn_mock_exchange().await;
    let app = common::test_app_with_exchange(&base_url).await;

    let (status, body) = common::send(
        &app,
        "POST",
        "/api/exchange/validate-binance",
        None,
        Some(json!({ "name": "kraken", "apiKey": VALID_KEY, "apiSecret": "test-secret" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Exchange kraken is not supported");
}

#[tokio::test(flavor = "multi_thread")]
async fn sync_creates_one_crypto_investment_per_nonzero_balance() {
    let base_url = spawn_mock_exchange().await;
    let app = common::test_app_with_exchange(&base_url).await;
    let (token, _) = common::register_user(&app, "Ana", "ana@example.com").await;

    let (status, created) = common::send(
        &app,
        "POST",
        "/api/exchange/sync",
        Some(&token),
        Some(credentials(VALID_KEY)),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    let created = created.as_array().expect("array");
    // ETH has a zero balance and is filtered out
    assert_eq!(created.len(), 2);

    let btc = created.iter().find(|i| i["symbol"] == "BTC").expect("BTC");
    assert_eq!(btc["type"], "crypto");
    assert_eq!(btc["name"], "BTC (binance)");
    assert_eq!(btc["quantity"], 0.5);
    assert_eq!(btc["currentPrice"], 50000.0);
    assert_eq!(btc["currency"], "EUR");

    let usdt = created.iter().find(|i| i["symbol"] == "USDT").expect("USDT");
    assert_eq!(usdt["quantity"], 125.0);
    assert_eq!(usdt["currentPrice"], 1.0);

    // The positions landed in the portfolio
    let (_, listed) = common::send(&app, "GET", "/api/investments", Some(&token), None).await;
    assert_eq!(listed.as_array().map(Vec::len), Some(2));
}

#[tokio::test(flavor = "multi_thread")]
async fn sync_with_bad_credentials_creates_nothing() {
    let base_url = spawn_mock_exchange().await;
    let app = common::test_app_with_exchange(&base_url).await;
    let (token, _) = common::register_user(&app, "Ana", "ana@example.com").await;

    let (status, body) = common::send(
        &app,
        "POST",
        "/api/exchange/sync",
        Some(&token),
        Some(credentials("wrong-key")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid API key or insufficient permissions");

    let (_, listed) = common::send(&app, "GET", "/api/investments", Some(&token), None).await;
    assert_eq!(listed.as_array().map(Vec::len), Some(0));
}
