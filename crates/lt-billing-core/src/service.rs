//! Billing service: provider lookups recorded through the repository

use std::sync::Arc;
use tracing::{info, instrument};

use lt_db::{CreatePlan, CreateSignup, PlanRow, SignupRow, SubscriptionRepository};

use crate::provider::PaymentProvider;
use crate::BillingError;

/// Longest provider id accepted from callers
const MAX_PROVIDER_ID_LEN: usize = 128;

/// Who a signup is recorded for
#[derive(Debug, Clone, Default)]
pub struct Subscriber {
    pub subject: String,
    pub email: Option<String>,
    pub name: Option<String>,
}

/// Billing service
pub struct BillingService<R: ?Sized, P: ?Sized> {
    repo: Arc<R>,
    provider: Arc<P>,
}

impl<R, P> BillingService<R, P>
where
    R: SubscriptionRepository + ?Sized,
    P: PaymentProvider + ?Sized,
{
    /// Create a new billing service
    pub fn new(repo: Arc<R>, provider: Arc<P>) -> Self {
        Self { repo, provider }
    }

    /// Look up a subscription at the provider and record who signed up
    #[instrument(skip(self, subscriber), fields(subject = %subscriber.subject))]
    pub async fn record_signup(
        &self,
        subscription_id: &str,
        subscriber: &Subscriber,
    ) -> Result<SignupRow, BillingError> {
        validate_provider_id(subscription_id, "subscriptionId")?;

        let subscription = self.provider.get_subscription(subscription_id).await?;
        let paypal_subscription_id = if subscription.id.is_empty() {
            subscription_id.to_string()
        } else {
            subscription.id
        };

        let row = self
            .repo
            .upsert_signup(CreateSignup {
                paypal_subscription_id,
                paypal_plan_id: subscription.plan_id,
                paypal_status: subscription.status,
                paypal_status_updated_at: subscription.status_update_time,
                paypal_start_time: subscription.start_time,
                user_sub: Some(subscriber.subject.clone()),
                user_email: subscriber.email.clone(),
                user_name: subscriber.name.clone(),
            })
            .await?;

        info!(
            subscription_id = %row.paypal_subscription_id,
            status = row.paypal_status.as_deref().unwrap_or("unknown"),
            "Recorded subscription signup"
        );
        Ok(row)
    }

    /// Import an existing provider plan (and its product) into the catalog
    #[instrument(skip(self))]
    pub async fn import_plan(
        &self,
        plan_id: &str,
        imported_by: Option<&str>,
    ) -> Result<PlanRow, BillingError> {
        validate_provider_id(plan_id, "planId")?;

        let plan = self.provider.get_plan(plan_id).await?;
        let product_id = plan
            .product_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| BillingError::InvalidPlan("plan has no product".to_string()))?;
        validate_provider_id(product_id, "product_id")?;

        let product = self.provider.get_product(product_id).await?;
        let cycle = plan
            .cycle_price()
            .ok_or_else(|| BillingError::InvalidPlan("plan has no billing cycles".to_string()))?;

        let raw_plan_json = to_compact_json(&plan.raw)?;
        let raw_product_json = to_compact_json(&product.raw)?;

        let row = self
            .repo
            .upsert_plan(CreatePlan {
                paypal_plan_id: if plan.id.is_empty() {
                    plan_id.to_string()
                } else {
                    plan.id.clone()
                },
                paypal_product_id: Some(product.id.clone()),
                plan_name: plan.name.clone(),
                plan_description: plan.description.clone(),
                plan_status: plan.status.clone(),
                billing_interval_unit: cycle.interval_unit,
                billing_interval_count: cycle.interval_count,
                currency_code: cycle.currency,
                price_value: cycle.price,
                created_by_email: imported_by.map(str::to_string),
                raw_product_json: Some(raw_product_json),
                raw_plan_json: Some(raw_plan_json),
            })
            .await?;

        info!(plan_id = %row.paypal_plan_id, "Imported subscription plan");
        Ok(row)
    }

    /// Recorded plans, newest first
    pub async fn list_plans(&self) -> Result<Vec<PlanRow>, BillingError> {
        Ok(self.repo.list_plans().await?)
    }

    /// Whether the backing store answers
    pub async fn ping(&self) -> Result<(), BillingError> {
        Ok(self.repo.ping().await?)
    }
}

impl<R: ?Sized, P: ?Sized> Clone for BillingService<R, P> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
            provider: Arc::clone(&self.provider),
        }
    }
}

impl<R: ?Sized, P: ?Sized> std::fmt::Debug for BillingService<R, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BillingService").finish_non_exhaustive()
    }
}

/// Provider ids end up in URL paths; only `[A-Za-z0-9_-]` is allowed
fn validate_provider_id(id: &str, field: &str) -> Result<(), BillingError> {
    let well_formed = !id.is_empty()
        && id.len() <= MAX_PROVIDER_ID_LEN
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
    if well_formed {
        Ok(())
    } else {
        Err(BillingError::InvalidInput(format!("{field} is missing or malformed")))
    }
}

fn to_compact_json(value: &serde_json::Value) -> Result<String, BillingError> {
    serde_json::to_string(value).map_err(|e| BillingError::Internal(e.to_string()))
}
