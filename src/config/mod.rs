use once_cell::sync::Lazy;
use std::env;

/// Fallback signing secret used when JWT_SECRET is unset. Kept for parity with
/// the original deployment defaults; a warning is logged at startup.
pub const DEFAULT_JWT_SECRET: &str = "financiall-secret-key";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub cors_origin: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_secret_is_default: bool,
    pub jwt_expiry_days: i64,
    pub bcrypt_cost: u32,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            _ => Environment::Development,
        };

        let port = env::var("PORT")
            .ok()
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(3001);

        // CORS_ORIGIN takes precedence; FRONTEND_URL is the legacy name
        let cors_origin = env::var("CORS_ORIGIN")
            .or_else(|_| env::var("FRONTEND_URL"))
            .ok();

        let url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://data/financiall.db".to_string());

        let (jwt_secret, jwt_secret_is_default) = match env::var("JWT_SECRET") {
            Ok(s) if !s.is_empty() => (s, false),
            _ => (DEFAULT_JWT_SECRET.to_string(), true),
        };

        let jwt_expiry_days = env::var("JWT_EXPIRY_DAYS")
            .ok()
            .and_then(|s| s.parse::<i64>().ok())
            .unwrap_or(7);

        let bcrypt_cost = env::var("BCRYPT_COST")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(12);

        Self {
            environment,
            server: ServerConfig { port, cors_origin },
            database: DatabaseConfig {
                url,
                max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|s| s.parse::<u32>().ok())
                    .unwrap_or(5),
            },
            security: SecurityConfig {
                jwt_secret,
                jwt_secret_is_default,
                jwt_expiry_days,
                bcrypt_cost,
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_env_unset() {
        let config = AppConfig::from_env();
        assert_eq!(config.security.jwt_expiry_days, 7);
        assert_eq!(config.security.bcrypt_cost, 12);
    }
}
