pub mod auth;
pub mod categories;
pub mod currencies;
pub mod entities;
pub mod exchange;
pub mod export;
pub mod investments;
pub mod reports;
pub mod settings;
pub mod tax_configs;
pub mod transactions;
