// Export/import portability

mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};

fn ids(section: &Value) -> Vec<String> {
    let mut ids: Vec<String> = section
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|row| row["id"].as_str())
        .map(String::from)
        .collect();
    ids.sort();
    ids
}

async fn seed_some_data(app: &axum::Router, token: &str) {
    let (status, _) = common::send(
        app,
        "POST",
        "/api/transactions",
        Some(token),
        Some(json!({ "type": "income", "amount": 2500.0, "category": "Salary", "date": "2026-08-01" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = common::send(
        app,
        "POST",
        "/api/investments",
        Some(token),
        Some(json!({
            "type": "stock",
            "symbol": "ACME",
            "name": "Acme Corp",
            "quantity": 2.0,
            "purchasePrice": 100.0,
            "currentPrice": 150.0,
            "purchaseDate": "2026-01-15",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = common::send(
        app,
        "POST",
        "/api/tax-configs",
        Some(token),
        Some(json!({ "name": "IRPF", "rate": 19.0, "country": "ES", "isDefault": true })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn reimporting_an_export_is_a_no_op() {
    let app = common::test_app().await;
    let (token, _) = common::register_user(&app, "Ana", "ana@example.com").await;
    seed_some_data(&app, &token).await;

    let (status, exported) = common::send(&app, "GET", "/api/export", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(exported["transactions"].as_array().map(Vec::len), Some(1));
    assert_eq!(exported["investments"].as_array().map(Vec::len), Some(1));
    assert_eq!(exported["taxConfigs"].as_array().map(Vec::len), Some(1));

    // Rows keep their ids, so importing into the same account changes nothing
    let (status, _) = common::send(
        &app,
        "POST",
        "/api/import",
        Some(&token),
        Some(exported.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, after) = common::send(&app, "GET", "/api/export", Some(&token), None).await;
    for section in ["transactions", "investments", "categories", "entities", "taxConfigs"] {
        assert_eq!(ids(&after[section]), ids(&exported[section]), "{}", section);
    }
}

#[tokio::test]
async fn import_takes_ownership_of_foreign_blobs() {
    let app = common::test_app().await;
    let (ana, _) = common::register_user(&app, "Ana", "ana@example.com").await;
    let (bob, bob_id) = common::register_user(&app, "Bob", "bob@example.com").await;
    seed_some_data(&app, &ana).await;

    let (_, exported) = common::send(&app, "GET", "/api/export", Some(&ana), None).await;

    // A blob migrated from another instance: same shape, fresh row ids.
    // Reference sections are left out so Bob keeps his own seeded defaults.
    let mut transactions = exported["transactions"].clone();
    for (i, row) in transactions
        .as_array_mut()
        .expect("array")
        .iter_mut()
        .enumerate()
    {
        row["id"] = json!(format!("imported-t{}", i));
    }
    let blob = json!({
        "transactions": transactions,
        "investments": [],
    });
    let (status, _) = common::send(&app, "POST", "/api/import", Some(&bob), Some(blob)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // Bob owns the imported rows even though the blob recorded Ana's userId
    let (_, bobs) = common::send(&app, "GET", "/api/export", Some(&bob), None).await;
    assert_eq!(ids(&bobs["transactions"]), vec!["imported-t0".to_string()]);
    for row in bobs["transactions"].as_array().expect("array") {
        assert_eq!(row["userId"], bob_id.as_str());
    }

    // Ana's copy is untouched
    let (_, anas) = common::send(&app, "GET", "/api/export", Some(&ana), None).await;
    assert_eq!(ids(&anas["transactions"]), ids(&exported["transactions"]));
}
