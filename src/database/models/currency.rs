use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Global currency reference row. `exchange_rate` is expressed relative to
/// the base currency (the base itself has rate 1).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Currency {
    pub id: String,
    pub code: String,
    pub name: String,
    pub symbol: String,
    pub exchange_rate: f64,
    pub version: i64,
}

impl Currency {
    /// Convert an amount in this currency into the base currency
    pub fn to_base(&self, amount: f64) -> f64 {
        if self.exchange_rate == 0.0 {
            return amount;
        }
        amount / self.exchange_rate
    }
}
