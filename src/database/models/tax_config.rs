use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TaxConfig {
    pub id: String,
    pub user_id: String,
    pub name: String,
    /// Percentage, e.g. 21.0
    pub rate: f64,
    pub country: String,
    pub is_default: bool,
    pub version: i64,
    pub created_at: String,
}
