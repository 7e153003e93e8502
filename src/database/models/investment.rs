use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum InvestmentType {
    Stock,
    Crypto,
    Bond,
    Fund,
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Investment {
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub investment_type: InvestmentType,
    pub symbol: String,
    pub name: String,
    pub quantity: f64,
    pub purchase_price: f64,
    pub current_price: f64,
    pub currency: String,
    pub purchase_date: String,
    pub entity: Option<String>,
    pub version: i64,
    pub created_at: String,
}

impl Investment {
    pub fn current_value(&self) -> f64 {
        self.quantity * self.current_price
    }

    pub fn gain_loss(&self) -> f64 {
        self.quantity * (self.current_price - self.purchase_price)
    }

    pub fn gain_loss_percent(&self) -> f64 {
        if self.purchase_price == 0.0 {
            return 0.0;
        }
        (self.current_price - self.purchase_price) / self.purchase_price * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Investment {
        Investment {
            id: "i1".into(),
            user_id: "u1".into(),
            investment_type: InvestmentType::Stock,
            symbol: "ACME".into(),
            name: "Acme Corp".into(),
            quantity: 2.0,
            purchase_price: 100.0,
            current_price: 150.0,
            currency: "EUR".into(),
            purchase_date: "2024-01-15".into(),
            entity: None,
            version: 1,
            created_at: String::new(),
        }
    }

    #[test]
    fn value_and_gain_loss_math() {
        let inv = sample();
        assert_eq!(inv.current_value(), 300.0);
        assert_eq!(inv.gain_loss(), 100.0);
        assert_eq!(format!("{:.2}", inv.gain_loss_percent()), "50.00");
    }

    #[test]
    fn zero_purchase_price_has_zero_percent() {
        let mut inv = sample();
        inv.purchase_price = 0.0;
        assert_eq!(inv.gain_loss_percent(), 0.0);
    }
}
