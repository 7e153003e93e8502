use financiall::{app, config, database, AppState};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();
    tracing::info!("Starting FinanciAll API in {:?} mode", config.environment);

    if config.security.jwt_secret_is_default {
        tracing::warn!("JWT_SECRET is unset; using the built-in development secret");
    }

    let pool = database::manager::connect()
        .await
        .unwrap_or_else(|e| panic!("failed to open database: {}", e));
    database::manager::init_schema(&pool)
        .await
        .unwrap_or_else(|e| panic!("failed to initialize schema: {}", e));
    database::seed::seed_global_defaults(&pool)
        .await
        .unwrap_or_else(|e| panic!("failed to seed reference data: {}", e));

    let state = AppState::new(pool);
    let router = app(state);

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("🚀 FinanciAll API listening on http://{}", bind_addr);

    axum::serve(listener, router).await.expect("server");
}
