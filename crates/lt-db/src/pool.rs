//! Connection pool and schema bootstrap

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

use crate::error::DbResult;

/// Database connection pool type alias
pub type DbPool = PgPool;

/// Pool sizing knobs
#[derive(Debug, Clone)]
pub struct PoolOptions {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for PoolOptions {
    fn default() -> Self {
        Self {
            max_connections: 10,
            acquire_timeout: Duration::from_secs(5),
        }
    }
}

/// Create a pool with default options
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    create_pool_with_options(database_url, &PoolOptions::default()).await
}

/// Create a pool with explicit options
pub async fn create_pool_with_options(
    database_url: &str,
    options: &PoolOptions,
) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(options.max_connections)
        .acquire_timeout(options.acquire_timeout)
        .connect(database_url)
        .await
}

const CREATE_SIGNUPS: &str = r#"
CREATE TABLE IF NOT EXISTS subscription_signups (
    id SERIAL PRIMARY KEY,
    paypal_subscription_id TEXT UNIQUE NOT NULL,
    paypal_plan_id TEXT,
    paypal_status TEXT,
    paypal_status_updated_at TEXT,
    paypal_start_time TEXT,
    user_sub TEXT,
    user_email TEXT,
    user_name TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

const CREATE_PLANS: &str = r#"
CREATE TABLE IF NOT EXISTS subscription_plans (
    id SERIAL PRIMARY KEY,
    paypal_plan_id TEXT UNIQUE NOT NULL,
    paypal_product_id TEXT,
    plan_name TEXT,
    plan_description TEXT,
    plan_status TEXT,
    billing_interval_unit TEXT,
    billing_interval_count INTEGER,
    currency_code TEXT,
    price_value TEXT,
    created_by_email TEXT,
    raw_product_json TEXT,
    raw_plan_json TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

/// Create the subscription tables if they do not exist yet
pub async fn init_schema(pool: &DbPool) -> DbResult<()> {
    sqlx::query(CREATE_SIGNUPS).execute(pool).await?;
    sqlx::query(CREATE_PLANS).execute(pool).await?;
    tracing::debug!("Subscription schema ready");
    Ok(())
}
