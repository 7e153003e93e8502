use chrono::Utc;
use sqlx::sqlite::SqlitePool;
use sqlx::SqliteConnection;
use tracing::info;
use uuid::Uuid;

use super::manager::DatabaseError;

/// Default categories created for every new user at registration
const USER_CATEGORIES: &[(&str, &str, &str, &str)] = &[
    ("Salary", "income", "#22c55e", "salary"),
    ("Freelance", "income", "#3b82f6", "wallet"),
    ("Investments", "income", "#8b5cf6", "investment"),
    ("Food", "expense", "#f59e0b", "food"),
    ("Transport", "expense", "#ef4444", "transport"),
    ("Housing", "expense", "#06b6d4", "home"),
    ("Entertainment", "expense", "#ec4899", "entertainment"),
    ("Health", "expense", "#10b981", "health"),
];

/// Default entities created for every new user at registration
const USER_ENTITIES: &[(&str, &str, &str)] = &[
    ("Banco Santander", "bank", "#dc2626"),
    ("BBVA", "bank", "#1d4ed8"),
    ("eToro", "broker", "#059669"),
    ("Binance", "exchange", "#f59e0b"),
];

/// Global reference tier, visible to all users unless shadowed
const GLOBAL_CATEGORIES: &[(&str, &str, &str, &str)] = &[
    ("Salary", "income", "#10b981", "salary"),
    ("Investments", "income", "#8b5cf6", "investment"),
    ("Food", "expense", "#f59e0b", "food"),
    ("Transport", "expense", "#ef4444", "transport"),
    ("Housing", "expense", "#06b6d4", "home"),
    ("Entertainment", "expense", "#ec4899", "entertainment"),
    ("Health", "expense", "#10b981", "health"),
];

const GLOBAL_ENTITIES: &[(&str, &str, &str)] = &[
    ("Main Bank", "bank", "#3b82f6"),
    ("Broker", "broker", "#8b5cf6"),
];

const CURRENCIES: &[(&str, &str, &str, f64)] = &[
    ("EUR", "Euro", "€", 1.0),
    ("USD", "US Dollar", "$", 1.1),
    ("GBP", "British Pound", "£", 0.85),
];

/// Seed the global reference tier and the currency table. Runs at startup;
/// skips any tier that already has rows.
pub async fn seed_global_defaults(pool: &SqlitePool) -> Result<(), DatabaseError> {
    let now = Utc::now().to_rfc3339();

    let (category_count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM categories WHERE user_id IS NULL")
            .fetch_one(pool)
            .await?;
    if category_count == 0 {
        for (name, category_type, color, icon) in GLOBAL_CATEGORIES {
            sqlx::query(
                "INSERT INTO categories (id, user_id, name, type, color, icon, created_at)
                 VALUES (?, NULL, ?, ?, ?, ?, ?)",
            )
            .bind(Uuid::new_v4().to_string())
            .bind(name)
            .bind(category_type)
            .bind(color)
            .bind(icon)
            .bind(&now)
            .execute(pool)
            .await?;
        }
    }

    let (entity_count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM entities WHERE user_id IS NULL")
            .fetch_one(pool)
            .await?;
    if entity_count == 0 {
        for (name, entity_type, color) in GLOBAL_ENTITIES {
            sqlx::query(
                "INSERT INTO entities (id, user_id, name, type, color, created_at)
                 VALUES (?, NULL, ?, ?, ?, ?)",
            )
            .bind(Uuid::new_v4().to_string())
            .bind(name)
            .bind(entity_type)
            .bind(color)
            .bind(&now)
            .execute(pool)
            .await?;
        }
    }

    let (currency_count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM currencies")
        .fetch_one(pool)
        .await?;
    if currency_count == 0 {
        for (code, name, symbol, rate) in CURRENCIES {
            sqlx::query(
                "INSERT INTO currencies (id, code, name, symbol, exchange_rate)
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(Uuid::new_v4().to_string())
            .bind(code)
            .bind(name)
            .bind(symbol)
            .bind(rate)
            .execute(pool)
            .await?;
        }
    }

    info!("Global reference data seeded");
    Ok(())
}

/// Seed the per-user defaults (8 categories, 4 entities, settings row).
/// Runs inside the registration transaction so a failure leaves no partial
/// seed state.
pub async fn seed_user_defaults(
    conn: &mut SqliteConnection,
    user_id: &str,
) -> Result<(), DatabaseError> {
    let now = Utc::now().to_rfc3339();

    for (name, category_type, color, icon) in USER_CATEGORIES {
        sqlx::query(
            "INSERT INTO categories (id, user_id, name, type, color, icon, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(user_id)
        .bind(name)
        .bind(category_type)
        .bind(color)
        .bind(icon)
        .bind(&now)
        .execute(&mut *conn)
        .await?;
    }

    for (name, entity_type, color) in USER_ENTITIES {
        sqlx::query(
            "INSERT INTO entities (id, user_id, name, type, color, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(user_id)
        .bind(name)
        .bind(entity_type)
        .bind(color)
        .bind(&now)
        .execute(&mut *conn)
        .await?;
    }

    sqlx::query("INSERT INTO user_settings (user_id, theme, base_currency) VALUES (?, 'light', 'EUR')")
        .bind(user_id)
        .execute(&mut *conn)
        .await?;

    Ok(())
}
