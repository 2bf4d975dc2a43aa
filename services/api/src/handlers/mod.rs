//! HTTP handlers

mod auth;
mod health;
mod subscriptions;

pub use auth::{admin, auth_config, google_login, logout, me, secret};
pub use health::{health, ready};
pub use subscriptions::{import_plan, list_plans, record_signup};
