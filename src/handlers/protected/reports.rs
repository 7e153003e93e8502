// handlers/protected/reports.rs - GET /api/reports/summary

use std::collections::HashMap;

use axum::extract::State;
use axum::{response::Json, Extension};
use serde_json::{json, Value};

use crate::database::models::{Currency, Investment, PublicUser, Transaction, TransactionType};
use crate::error::ApiError;
use crate::AppState;

/// GET /api/reports/summary - Aggregates backing the Dashboard and Reports
/// views: income/expense totals and per-category breakdown converted to the
/// caller's base currency, plus investment value and gain/loss.
pub async fn summary(
    State(state): State<AppState>,
    Extension(user): Extension<PublicUser>,
) -> Result<Json<Value>, ApiError> {
    let settings = super::settings::fetch_settings(&state, &user.id).await?;

    let currencies: Vec<Currency> = sqlx::query_as("SELECT * FROM currencies")
        .fetch_all(&state.pool)
        .await?;
    let currencies: HashMap<String, Currency> = currencies
        .into_iter()
        .map(|c| (c.code.clone(), c))
        .collect();
    let base_rate = currencies
        .get(&settings.base_currency)
        .map(|c| c.exchange_rate)
        .unwrap_or(1.0);

    // Rates are stored relative to the seeded base; converting into the
    // caller's base divides out the source rate and applies the target's.
    let to_base = |amount: f64, code: &str| -> f64 {
        currencies
            .get(code)
            .map_or(amount, |c| c.to_base(amount) * base_rate)
    };

    let transactions: Vec<Transaction> =
        sqlx::query_as("SELECT * FROM transactions WHERE user_id = ?")
            .bind(&user.id)
            .fetch_all(&state.pool)
            .await?;

    let mut total_income = 0.0;
    let mut total_expense = 0.0;
    let mut by_category: HashMap<(String, TransactionType), f64> = HashMap::new();
    for t in &transactions {
        let amount = to_base(t.amount, &t.currency);
        match t.transaction_type {
            TransactionType::Income => total_income += amount,
            TransactionType::Expense => total_expense += amount,
        }
        *by_category
            .entry((t.category.clone(), t.transaction_type))
            .or_insert(0.0) += amount;
    }

    let investments: Vec<Investment> =
        sqlx::query_as("SELECT * FROM investments WHERE user_id = ?")
            .bind(&user.id)
            .fetch_all(&state.pool)
            .await?;

    let mut value = 0.0;
    let mut cost = 0.0;
    for i in &investments {
        value += to_base(i.current_value(), &i.currency);
        cost += to_base(i.quantity * i.purchase_price, &i.currency);
    }
    let gain_loss = value - cost;
    let gain_loss_percent = if cost > 0.0 { gain_loss / cost * 100.0 } else { 0.0 };

    let mut categories: Vec<Value> = by_category
        .into_iter()
        .map(|((category, transaction_type), total)| {
            json!({
                "category": category,
                "type": transaction_type,
                "total": total,
            })
        })
        .collect();
    categories.sort_by(|a, b| a["category"].as_str().cmp(&b["category"].as_str()));

    Ok(Json(json!({
        "baseCurrency": settings.base_currency,
        "totals": {
            "income": total_income,
            "expense": total_expense,
            "net": total_income - total_expense,
        },
        "byCategory": categories,
        "investments": {
            "count": investments.len(),
            "value": value,
            "cost": cost,
            "gainLoss": gain_loss,
            "gainLossPercent": gain_loss_percent,
        },
    })))
}
