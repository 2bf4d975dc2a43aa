//! Logintemplate API
//!
//! Google sign-in with stateless session cookies, plus PayPal subscription
//! records.
//!
//! ## REST Endpoints
//!
//! - `GET /api/auth/config` - Public sign-in settings
//! - `GET /api/auth/me` - Current session
//! - `POST /api/auth/google` - Exchange a Google ID token for a session cookie
//! - `POST /api/auth/logout` - Clear the session cookie
//! - `GET /api/auth/admin` - Admin check
//! - `GET /api/secret` - Protected example
//! - `POST /api/subscriptions` - Record the caller's PayPal subscription
//! - `GET /api/subscriptions/plans` - Recorded plans
//! - `POST /api/admin/plans` - Import a PayPal plan (admin)
//!
//! ## Health Endpoints
//!
//! - `GET /health` - Liveness probe
//! - `GET /ready` - Readiness probe
//! - `GET /metrics` - Prometheus metrics

pub mod app;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod metrics;
pub mod state;

pub use app::build_router;
pub use config::{Config, ConfigError};
pub use error::{ApiError, ApiResult};
pub use state::{AppState, DynBilling};
