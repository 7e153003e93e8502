use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{Scope, Scoped};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum CategoryType {
    Income,
    Expense,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    /// None = global default tier
    pub user_id: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub category_type: CategoryType,
    pub color: String,
    pub icon: String,
    pub version: i64,
    pub created_at: String,
}

impl Scoped for Category {
    fn scope(&self) -> Scope {
        Scope::from_column(self.user_id.clone())
    }

    // Shadowing key is name + type so income/expense categories never collide
    fn scope_key(&self) -> String {
        format!(
            "{}:{}",
            self.name,
            match self.category_type {
                CategoryType::Income => "income",
                CategoryType::Expense => "expense",
            }
        )
    }
}
