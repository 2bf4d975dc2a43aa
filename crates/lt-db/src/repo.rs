//! Repository traits

use async_trait::async_trait;

use crate::error::DbResult;
use crate::models::*;

/// Subscription persistence
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Insert or refresh a signup keyed by PayPal subscription id
    async fn upsert_signup(&self, signup: CreateSignup) -> DbResult<SignupRow>;

    /// Insert or refresh a plan keyed by PayPal plan id
    async fn upsert_plan(&self, plan: CreatePlan) -> DbResult<PlanRow>;

    /// All recorded plans, newest first
    async fn list_plans(&self) -> DbResult<Vec<PlanRow>>;

    /// Connectivity probe for readiness checks
    async fn ping(&self) -> DbResult<()>;
}

/// Signup upsert input
#[derive(Debug, Clone, Default)]
pub struct CreateSignup {
    pub paypal_subscription_id: String,
    pub paypal_plan_id: Option<String>,
    pub paypal_status: Option<String>,
    pub paypal_status_updated_at: Option<String>,
    pub paypal_start_time: Option<String>,
    pub user_sub: Option<String>,
    pub user_email: Option<String>,
    pub user_name: Option<String>,
}

/// Plan upsert input
#[derive(Debug, Clone, Default)]
pub struct CreatePlan {
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
    pub raw_product_json: Option<String>,
    pub raw_plan_json: Option<String>,
}
