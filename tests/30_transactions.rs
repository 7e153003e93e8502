// Transaction CRUD, filtering, and concurrency checks

mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};

async fn create_transaction(
    app: &axum::Router,
    token: &str,
    payload: Value,
) -> (StatusCode, Value) {
    common::send(app, "POST", "/api/transactions", Some(token), Some(payload)).await
}

#[tokio::test]
async fn create_fills_defaults_and_starts_at_version_one() {
    let app = common::test_app().await;
    let (token, _) = common::register_user(&app, "Ana", "ana@example.com").await;

    let (status, body) = create_transaction(
        &app,
        &token,
        json!({ "type": "income", "amount": 2500.0, "category": "Salary", "date": "2026-08-01" }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["type"], "income");
    assert_eq!(body["amount"], 2500.0);
    assert_eq!(body["currency"], "EUR");
    assert_eq!(body["description"], "");
    assert_eq!(body["version"], 1);
    assert!(body["id"].as_str().is_some());
}

#[tokio::test]
async fn create_rejects_unknown_category() {
    let app = common::test_app().await;
    let (token, _) = common::register_user(&app, "Ana", "ana@example.com").await;

    let (status, body) = create_transaction(
        &app,
        &token,
        json!({ "type": "expense", "amount": 10.0, "category": "Nope", "date": "2026-08-01" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Category does not exist for this transaction type");
}

#[tokio::test]
async fn create_rejects_category_of_the_wrong_type() {
    let app = common::test_app().await;
    let (token, _) = common::register_user(&app, "Ana", "ana@example.com").await;

    // Salary is an income category
    let (status, body) = create_transaction(
        &app,
        &token,
        json!({ "type": "expense", "amount": 10.0, "category": "Salary", "date": "2026-08-01" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Category does not exist for this transaction type");
}

#[tokio::test]
async fn list_filters_by_type_category_and_date_range() {
    let app = common::test_app().await;
    let (token, _) = common::register_user(&app, "Ana", "ana@example.com").await;

    for payload in [
        json!({ "type": "income", "amount": 2500.0, "category": "Salary", "date": "2026-08-01" }),
        json!({ "type": "expense", "amount": 60.0, "category": "Food", "date": "2026-08-05" }),
        json!({ "type": "expense", "amount": 30.0, "category": "Transport", "date": "2026-07-20" }),
    ] {
        let (status, _) = create_transaction(&app, &token, payload).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, all) = common::send(&app, "GET", "/api/transactions", Some(&token), None).await;
    let all = all.as_array().expect("array").clone();
    assert_eq!(all.len(), 3);
    // Newest first
    assert_eq!(all[0]["date"], "2026-08-05");
    assert_eq!(all[2]["date"], "2026-07-20");

    let (_, expenses) =
        common::send(&app, "GET", "/api/transactions?type=expense", Some(&token), None).await;
    assert_eq!(expenses.as_array().map(Vec::len), Some(2));

    let (_, food) =
        common::send(&app, "GET", "/api/transactions?category=Food", Some(&token), None).await;
    assert_eq!(food.as_array().map(Vec::len), Some(1));
    assert_eq!(food[0]["amount"], 60.0);

    let (_, august) = common::send(
        &app,
        "GET",
        "/api/transactions?from=2026-08-01&to=2026-08-31",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(august.as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn partial_update_bumps_version_and_keeps_other_fields() {
    let app = common::test_app().await;
    let (token, _) = common::register_user(&app, "Ana", "ana@example.com").await;

    let (_, created) = create_transaction(
        &app,
        &token,
        json!({ "type": "expense", "amount": 60.0, "category": "Food", "date": "2026-08-05", "description": "groceries" }),
    )
    .await;
    let id = created["id"].as_str().expect("id");

    let (status, updated) = common::send(
        &app,
        "PUT",
        &format!("/api/transactions/{}", id),
        Some(&token),
        Some(json!({ "amount": 75.5 })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["amount"], 75.5);
    assert_eq!(updated["description"], "groceries");
    assert_eq!(updated["category"], "Food");
    assert_eq!(updated["version"], 2);
}

#[tokio::test]
async fn stale_version_is_rejected_with_conflict() {
    let app = common::test_app().await;
    let (token, _) = common::register_user(&app, "Ana", "ana@example.com").await;

    let (_, created) = create_transaction(
        &app,
        &token,
        json!({ "type": "expense", "amount": 60.0, "category": "Food", "date": "2026-08-05" }),
    )
    .await;
    let id = created["id"].as_str().expect("id").to_string();
    let path = format!("/api/transactions/{}", id);

    // First writer wins
    let (status, _) = common::send(
        &app,
        "PUT",
        &path,
        Some(&token),
        Some(json!({ "amount": 70.0, "version": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Second writer still holds version 1
    let (status, body) = common::send(
        &app,
        "PUT",
        &path,
        Some(&token),
        Some(json!({ "amount": 80.0, "version": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Transaction was modified concurrently");

    // The row kept the first writer's value
    let (_, all) = common::send(&app, "GET", "/api/transactions", Some(&token), None).await;
    assert_eq!(all[0]["amount"], 70.0);
}

#[tokio::test]
async fn update_of_absent_transaction_is_not_found() {
    let app = common::test_app().await;
    let (token, _) = common::register_user(&app, "Ana", "ana@example.com").await;

    let (status, body) = common::send(
        &app,
        "PUT",
        "/api/transactions/no-such-id",
        Some(&token),
        Some(json!({ "amount": 1.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Transaction not found");
}

#[tokio::test]
async fn delete_is_idempotent_and_leaves_other_rows_alone() {
    let app = common::test_app().await;
    let (token, _) = common::register_user(&app, "Ana", "ana@example.com").await;

    let (_, first) = create_transaction(
        &app,
        &token,
        json!({ "type": "expense", "amount": 60.0, "category": "Food", "date": "2026-08-05" }),
    )
    .await;
    let (_, second) = create_transaction(
        &app,
        &token,
        json!({ "type": "income", "amount": 100.0, "category": "Salary", "date": "2026-08-06" }),
    )
    .await;
    let path = format!("/api/transactions/{}", first["id"].as_str().expect("id"));

    let (status, _) = common::send(&app, "DELETE", &path, Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    // Deleting it again is a no-op
    let (status, _) = common::send(&app, "DELETE", &path, Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, remaining) = common::send(&app, "GET", "/api/transactions", Some(&token), None).await;
    let remaining = remaining.as_array().expect("array");
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0]["id"], second["id"]);
}

#[tokio::test]
async fn users_cannot_see_or_touch_each_others_rows() {
    let app = common::test_app().await;
    let (ana, _) = common::register_user(&app, "Ana", "ana@example.com").await;
    let (bob, _) = common::register_user(&app, "Bob", "bob@example.com").await;

    let (_, created) = create_transaction(
        &app,
        &ana,
        json!({ "type": "expense", "amount": 60.0, "category": "Food", "date": "2026-08-05" }),
    )
    .await;
    let path = format!("/api/transactions/{}", created["id"].as_str().expect("id"));

    let (_, bobs) = common::send(&app, "GET", "/api/transactions", Some(&bob), None).await;
    assert_eq!(bobs.as_array().map(Vec::len), Some(0));

    let (status, _) = common::send(
        &app,
        "PUT",
        &path,
        Some(&bob),
        Some(json!({ "amount": 1.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Bob's delete is a no-op on Ana's row
    let (status, _) = common::send(&app, "DELETE", &path, Some(&bob), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, anas) = common::send(&app, "GET", "/api/transactions", Some(&ana), None).await;
    assert_eq!(anas.as_array().map(Vec::len), Some(1));
}
