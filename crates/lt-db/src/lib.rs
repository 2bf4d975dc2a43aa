//! lt-db - persistence for subscription signups and plans
//!
//! SQLx-based Postgres layer. Row types map one-to-one onto tables; the
//! repository traits are what the billing service depends on.
//!
//! # Example
//!
//! ```rust,ignore
//! use lt_db::{create_pool, init_schema, Repositories};
//!
//! let pool = create_pool("postgres://localhost/logintemplate").await?;
//! init_schema(&pool).await?;
//! let repos = Repositories::new(pool);
//! let plans = repos.subscriptions.list_plans().await?;
//! ```

pub mod error;
pub mod models;
pub mod pg;
pub mod pool;
pub mod repo;

pub use error::{DbError, DbResult};
pub use models::*;
pub use pg::{PgSubscriptionRepository, Repositories};
pub use pool::{create_pool, create_pool_with_options, init_schema, DbPool, PoolOptions};
pub use repo::*;
