//! Database row models
//!
//! PayPal timestamps are stored as the strings PayPal sent; only our own
//! bookkeeping columns are typed.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Row of `subscription_signups`
#[derive(Debug, Clone, FromRow)]
pub struct SignupRow {
    pub id: i32,
    pub paypal_subscription_id: String,
    pub paypal_plan_id: Option<String>,
    pub paypal_status: Option<String>,
    pub paypal_status_updated_at: Option<String>,
    pub paypal_start_time: Option<String>,
    pub user_sub: Option<String>,
    pub user_email: Option<String>,
    pub user_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row of `subscription_plans` as listed to clients (raw JSON omitted)
#[derive(Debug, Clone, FromRow)]
pub struct PlanRow {
    pub paypal_plan_id: String,
    pub paypal_product_id: Option<String>,
    pub plan_name: Option<String>,
    pub plan_description: Option<String>,
    pub plan_status: Option<String>,
    pub billing_interval_unit: Option<String>,
    pub billing_interval_count: Option<i32>,
    pub currency_code: Option<String>,
    pub price_value: Option<String>,
    pub created_by_email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
