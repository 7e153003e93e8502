use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub transaction_type: TransactionType,
    pub amount: f64,
    pub currency: String,
    pub category: String,
    pub description: String,
    pub date: String,
    pub entity: Option<String>,
    pub tax_amount: Option<f64>,
    pub tax_rate: Option<f64>,
    pub version: i64,
    pub created_at: String,
}
