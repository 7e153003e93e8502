pub mod category;
pub mod currency;
pub mod entity;
pub mod investment;
pub mod tax_config;
pub mod transaction;
pub mod user;

pub use category::{Category, CategoryType};
pub use currency::Currency;
pub use entity::{Entity, EntityType};
pub use investment::{Investment, InvestmentType};
pub use tax_config::TaxConfig;
pub use transaction::{Transaction, TransactionType};
pub use user::{PublicUser, User};

/// Ownership tier of a reference row (category, entity). Global rows are the
/// seeded defaults visible to everyone; user rows belong to one account and
/// shadow global rows with the same logical key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    Global,
    User(String),
}

impl Scope {
    pub fn from_column(user_id: Option<String>) -> Self {
        match user_id {
            Some(id) => Scope::User(id),
            None => Scope::Global,
        }
    }

    pub fn is_global(&self) -> bool {
        matches!(self, Scope::Global)
    }
}

/// Reference rows that live in the two-tier global/user model.
pub trait Scoped {
    fn scope(&self) -> Scope;

    /// Logical key used for shadowing (same key in both tiers = one visible row)
    fn scope_key(&self) -> String;
}

/// Merge the two reference tiers: user rows win over global rows that share
/// the same logical key.
pub fn merge_scoped<T: Scoped>(rows: Vec<T>) -> Vec<T> {
    let shadowed: std::collections::HashSet<String> = rows
        .iter()
        .filter(|r| !r.scope().is_global())
        .map(|r| r.scope_key())
        .collect();

    rows.into_iter()
        .filter(|r| !r.scope().is_global() || !shadowed.contains(&r.scope_key()))
        .collect()
}
