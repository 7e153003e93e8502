use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{Scope, Scoped};

/// Financial institution kind (a bank, broker, or exchange account grouping)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum EntityType {
    Bank,
    Broker,
    Exchange,
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub id: String,
    /// None = global default tier
    pub user_id: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub entity_type: EntityType,
    pub color: String,
    pub version: i64,
    pub created_at: String,
}

impl Scoped for Entity {
    fn scope(&self) -> Scope {
        Scope::from_column(self.user_id.clone())
    }

    fn scope_key(&self) -> String {
        self.name.clone()
    }
}
