pub mod auth;
pub mod exchange;
