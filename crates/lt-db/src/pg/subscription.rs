//! PostgreSQL subscription repository implementation

use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::{DbError, DbResult};
use crate::models::{PlanRow, SignupRow};
use crate::repo::{CreatePlan, CreateSignup, SubscriptionRepository};

/// PostgreSQL subscription repository
#[derive(Clone)]
pub struct PgSubscriptionRepository {
    pool: PgPool,
}

impl PgSubscriptionRepository {
    /// Create a new subscription repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriptionRepository for PgSubscriptionRepository {
    async fn upsert_signup(&self, signup: CreateSignup) -> DbResult<SignupRow> {
        if signup.paypal_subscription_id.is_empty() {
            return Err(DbError::Invalid("empty subscription id".to_string()));
        }

        let row = sqlx::query_as::<_, SignupRow>(
            r#"
            INSERT INTO subscription_signups (
                paypal_subscription_id, paypal_plan_id, paypal_status,
                paypal_status_updated_at, paypal_start_time,
                user_sub, user_email, user_name
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (paypal_subscription_id) DO UPDATE SET
                paypal_plan_id = EXCLUDED.paypal_plan_id,
                paypal_status = EXCLUDED.paypal_status,
                paypal_status_updated_at = EXCLUDED.paypal_status_updated_at,
                paypal_start_time = EXCLUDED.paypal_start_time,
                user_sub = EXCLUDED.user_sub,
                user_email = EXCLUDED.user_email,
                user_name = EXCLUDED.user_name,
                updated_at = NOW()
            RETURNING id, paypal_subscription_id, paypal_plan_id, paypal_status,
                      paypal_status_updated_at, paypal_start_time,
                      user_sub, user_email, user_name, created_at, updated_at
            "#,
        )
        .bind(&signup.paypal_subscription_id)
        .bind(&signup.paypal_plan_id)
        .bind(&signup.paypal_status)
        .bind(&signup.paypal_status_updated_at)
        .bind(&signup.paypal_start_time)
        .bind(&signup.user_sub)
        .bind(&signup.user_email)
        .bind(&signup.user_name)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn upsert_plan(&self, plan: CreatePlan) -> DbResult<PlanRow> {
        if plan.paypal_plan_id.is_empty() {
            return Err(DbError::Invalid("empty plan id".to_string()));
        }

        let row = sqlx::query_as::<_, PlanRow>(
            r#"
            INSERT INTO subscription_plans (
                paypal_plan_id, paypal_product_id, plan_name, plan_description,
                plan_status, billing_interval_unit, billing_interval_count,
                currency_code, price_value, created_by_email,
                raw_product_json, raw_plan_json
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (paypal_plan_id) DO UPDATE SET
                paypal_product_id = EXCLUDED.paypal_product_id,
                plan_name = EXCLUDED.plan_name,
                plan_description = EXCLUDED.plan_description,
                plan_status = EXCLUDED.plan_status,
                billing_interval_unit = EXCLUDED.billing_interval_unit,
                billing_interval_count = EXCLUDED.billing_interval_count,
                currency_code = EXCLUDED.currency_code,
                price_value = EXCLUDED.price_value,
                created_by_email = EXCLUDED.created_by_email,
                raw_product_json = EXCLUDED.raw_product_json,
                raw_plan_json = EXCLUDED.raw_plan_json,
                updated_at = NOW()
            RETURNING paypal_plan_id, paypal_product_id, plan_name, plan_description,
                      plan_status, billing_interval_unit, billing_interval_count,
                      currency_code, price_value, created_by_email, created_at, updated_at
            "#,
        )
        .bind(&plan.paypal_plan_id)
        .bind(&plan.paypal_product_id)
        .bind(&plan.plan_name)
        .bind(&plan.plan_description)
        .bind(&plan.plan_status)
        .bind(&plan.billing_interval_unit)
        .bind(plan.billing_interval_count)
        .bind(&plan.currency_code)
        .bind(&plan.price_value)
        .bind(&plan.created_by_email)
        .bind(&plan.raw_product_json)
        .bind(&plan.raw_plan_json)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn list_plans(&self) -> DbResult<Vec<PlanRow>> {
        let rows = sqlx::query_as::<_, PlanRow>(
            r#"
            SELECT paypal_plan_id, paypal_product_id, plan_name, plan_description,
                   plan_status, billing_interval_unit, billing_interval_count,
                   currency_code, price_value, created_by_email, created_at, updated_at
            FROM subscription_plans
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn ping(&self) -> DbResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
