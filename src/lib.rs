use std::sync::Arc;

use axum::http::HeaderValue;
use axum::{middleware as axum_middleware, routing::get, routing::post, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;

use services::exchange::ExchangeService;

#[derive(Clone)]
pub struct AppState {
    pub pool: sqlx::SqlitePool,
    pub exchange: Arc<ExchangeService>,
}

impl AppState {
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        Self {
            pool,
            exchange: Arc::new(ExchangeService::new()),
        }
    }

    pub fn with_exchange(pool: sqlx::SqlitePool, exchange: ExchangeService) -> Self {
        Self {
            pool,
            exchange: Arc::new(exchange),
        }
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(public_routes())
        .merge(protected_routes(state.clone()))
        // Global middleware
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    use handlers::public::{auth, exchange};

    Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/exchange/validate-binance", post(exchange::validate_binance))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    use axum::routing::put;
    use handlers::protected::{
        auth, categories, currencies, entities, exchange, export, investments, reports, settings,
        tax_configs, transactions,
    };

    Router::new()
        .route("/api/auth/verify", get(auth::verify))
        .route(
            "/api/transactions",
            get(transactions::list).post(transactions::create),
        )
        .route(
            "/api/transactions/:id",
            put(transactions::update).delete(transactions::remove),
        )
        .route(
            "/api/investments",
            get(investments::list).post(investments::create),
        )
        .route(
            "/api/investments/:id",
            put(investments::update).delete(investments::remove),
        )
        .route(
            "/api/categories",
            get(categories::list).post(categories::create),
        )
        .route(
            "/api/categories/:id",
            put(categories::update).delete(categories::remove),
        )
        .route("/api/entities", get(entities::list).post(entities::create))
        .route(
            "/api/entities/:id",
            put(entities::update).delete(entities::remove),
        )
        .route(
            "/api/tax-configs",
            get(tax_configs::list).post(tax_configs::create),
        )
        .route(
            "/api/tax-configs/:id",
            put(tax_configs::update).delete(tax_configs::remove),
        )
        .route(
            "/api/currencies",
            get(currencies::list).post(currencies::create),
        )
        .route(
            "/api/currencies/:id",
            put(currencies::update).delete(currencies::remove),
        )
        .route(
            "/api/settings",
            get(settings::get_settings).put(settings::update_settings),
        )
        .route("/api/reports/summary", get(reports::summary))
        .route("/api/export", get(export::export_data))
        .route("/api/import", post(export::import_data))
        .route("/api/exchange/sync", post(exchange::sync))
        .route_layer(axum_middleware::from_fn_with_state(
            state,
            middleware::auth::jwt_auth_middleware,
        ))
}

fn cors_layer() -> CorsLayer {
    match config::config()
        .server
        .cors_origin
        .as_deref()
        .and_then(|o| o.parse::<HeaderValue>().ok())
    {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(tower_http::cors::Any)
            .allow_headers(tower_http::cors::Any),
        None => CorsLayer::permissive(),
    }
}

async fn root() -> axum::response::Json<Value> {
    axum::response::Json(json!({
        "name": "FinanciAll API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/health (public)",
            "auth": "/api/auth/register, /api/auth/login (public); /api/auth/verify (protected)",
            "transactions": "/api/transactions[/:id] (protected)",
            "investments": "/api/investments[/:id] (protected)",
            "categories": "/api/categories[/:id] (protected)",
            "entities": "/api/entities[/:id] (protected)",
            "tax_configs": "/api/tax-configs[/:id] (protected)",
            "currencies": "/api/currencies[/:id] (protected)",
            "settings": "/api/settings (protected)",
            "reports": "/api/reports/summary (protected)",
            "export": "/api/export, /api/import (protected)",
            "exchange": "/api/exchange/validate-binance (public), /api/exchange/sync (protected)",
        }
    }))
}

async fn health(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match database::manager::health_check(&state.pool).await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "status": "OK",
                "timestamp": now.to_rfc3339(),
                "version": env!("CARGO_PKG_VERSION"),
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                axum::http::StatusCode::SERVICE_UNAVAILABLE,
                axum::response::Json(json!({
                    "status": "degraded",
                    "timestamp": now.to_rfc3339(),
                    "version": env!("CARGO_PKG_VERSION"),
                    "error": "database unreachable",
                })),
            )
        }
    }
}
