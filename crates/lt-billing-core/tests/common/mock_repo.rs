//! In-memory subscription repository

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use dashmap::DashMap;
use lt_db::{
    CreatePlan, CreateSignup, DbError, DbResult, PlanRow, SignupRow, SubscriptionRepository,
};
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Arc;

#[derive(Default, Clone)]
pub struct MockSubscriptionRepository {
    signups: Arc<DashMap<String, SignupRow>>,
    plans: Arc<DashMap<String, PlanRow>>,
    raw_plans: Arc<DashMap<String, (Option<String>, Option<String>)>>,
    clock: Arc<AtomicI64>,
    down: Arc<AtomicBool>,
}

impl MockSubscriptionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call fail as if the database were unreachable
    #[allow(dead_code)]
    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }

    #[allow(dead_code)]
    pub fn signup(&self, subscription_id: &str) -> Option<SignupRow> {
        self.signups.get(subscription_id).map(|r| r.value().clone())
    }

    #[allow(dead_code)]
    pub fn signup_count(&self) -> usize {
        self.signups.len()
    }

    /// Raw (product, plan) JSON stored for a plan
    #[allow(dead_code)]
    pub fn raw_json(&self, plan_id: &str) -> Option<(Option<String>, Option<String>)> {
        self.raw_plans.get(plan_id).map(|r| r.value().clone())
    }

    /// Monotonic fake clock so ordering by creation time is deterministic
    fn tick(&self) -> DateTime<Utc> {
        let n = self.clock.fetch_add(1, Ordering::SeqCst);
        Utc.timestamp_opt(1_700_000_000 + n, 0).unwrap()
    }

    fn check_up(&self) -> DbResult<()> {
        if self.down.load(Ordering::SeqCst) {
            return Err(DbError::Sqlx(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl SubscriptionRepository for MockSubscriptionRepository {
    async fn upsert_signup(&self, signup: CreateSignup) -> DbResult<SignupRow> {
        self.check_up()?;
        let now = self.tick();
        let next_id = self.signups.len() as i32 + 1;
        let mut entry = self
            .signups
            .entry(signup.paypal_subscription_id.clone())
            .or_insert_with(|| SignupRow {
                id: next_id,
                paypal_subscription_id: signup.paypal_subscription_id.clone(),
                paypal_plan_id: None,
                paypal_status: None,
                paypal_status_updated_at: None,
                paypal_start_time: None,
                user_sub: None,
                user_email: None,
                user_name: None,
                created_at: now,
                updated_at: now,
            });
        let row = entry.value_mut();
        row.paypal_plan_id = signup.paypal_plan_id;
        row.paypal_status = signup.paypal_status;
        row.paypal_status_updated_at = signup.paypal_status_updated_at;
        row.paypal_start_time = signup.paypal_start_time;
        row.user_sub = signup.user_sub;
        row.user_email = signup.user_email;
        row.user_name = signup.user_name;
        row.updated_at = now;
        Ok(row.clone())
    }

    async fn upsert_plan(&self, plan: CreatePlan) -> DbResult<PlanRow> {
        self.check_up()?;
        let now = self.tick();
        self.raw_plans.insert(
            plan.paypal_plan_id.clone(),
            (plan.raw_product_json.clone(), plan.raw_plan_json.clone()),
        );
        let mut entry = self
            .plans
            .entry(plan.paypal_plan_id.clone())
            .or_insert_with(|| PlanRow {
                paypal_plan_id: plan.paypal_plan_id.clone(),
                paypal_product_id: None,
                plan_name: None,
                plan_description: None,
                plan_status: None,
                billing_interval_unit: None,
                billing_interval_count: None,
                currency_code: None,
                price_value: None,
                created_by_email: None,
                created_at: now,
                updated_at: now,
            });
        let row = entry.value_mut();
        row.paypal_product_id = plan.paypal_product_id;
        row.plan_name = plan.plan_name;
        row.plan_description = plan.plan_description;
        row.plan_status = plan.plan_status;
        row.billing_interval_unit = plan.billing_interval_unit;
        row.billing_interval_count = plan.billing_interval_count;
        row.currency_code = plan.currency_code;
        row.price_value = plan.price_value;
        row.created_by_email = plan.created_by_email;
        row.updated_at = now;
        Ok(row.clone())
    }

    async fn list_plans(&self) -> DbResult<Vec<PlanRow>> {
        self.check_up()?;
        let mut rows: Vec<PlanRow> = self.plans.iter().map(|r| r.value().clone()).collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn ping(&self) -> DbResult<()> {
        self.check_up()
    }
}
