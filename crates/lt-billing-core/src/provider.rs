//! Payment provider abstraction and the resources read from it

use async_trait::async_trait;
use serde::Deserialize;

use crate::BillingError;

/// Payment provider trait
///
/// Read-only view of the provider's catalog and subscriptions. Plans and
/// products are created in the provider's own dashboard.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Fetch a subscription by provider id
    async fn get_subscription(&self, subscription_id: &str)
        -> Result<ProviderSubscription, BillingError>;

    /// Fetch a billing plan by provider id
    async fn get_plan(&self, plan_id: &str) -> Result<ProviderPlan, BillingError>;

    /// Fetch a catalog product by provider id
    async fn get_product(&self, product_id: &str) -> Result<ProviderProduct, BillingError>;
}

/// Subscription as reported by the provider
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderSubscription {
    pub id: String,
    pub plan_id: Option<String>,
    pub status: Option<String>,
    pub status_update_time: Option<String>,
    pub start_time: Option<String>,
}

/// Billing plan as reported by the provider
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderPlan {
    pub id: String,
    pub product_id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    #[serde(default)]
    pub billing_cycles: Vec<BillingCycle>,
    /// Response body exactly as received
    #[serde(skip)]
    pub raw: serde_json::Value,
}

/// One billing cycle of a plan
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BillingCycle {
    /// `TRIAL` or `REGULAR`
    pub tenure_type: Option<String>,
    pub frequency: Option<CycleFrequency>,
    pub pricing_scheme: Option<PricingScheme>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CycleFrequency {
    pub interval_unit: Option<String>,
    pub interval_count: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PricingScheme {
    pub fixed_price: Option<Money>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Money {
    pub value: Option<String>,
    pub currency_code: Option<String>,
}

/// Price and interval of the cycle a subscriber actually pays
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CyclePrice {
    pub price: Option<String>,
    pub currency: Option<String>,
    pub interval_unit: Option<String>,
    pub interval_count: Option<i32>,
}

impl ProviderPlan {
    /// The `REGULAR` cycle, or the first cycle when none is tagged regular
    pub fn regular_cycle(&self) -> Option<&BillingCycle> {
        self.billing_cycles
            .iter()
            .find(|c| c.tenure_type.as_deref() == Some("REGULAR"))
            .or_else(|| self.billing_cycles.first())
    }

    /// Price and interval of [`regular_cycle`](Self::regular_cycle)
    pub fn cycle_price(&self) -> Option<CyclePrice> {
        let cycle = self.regular_cycle()?;
        let money = cycle
            .pricing_scheme
            .as_ref()
            .and_then(|p| p.fixed_price.as_ref());
        let frequency = cycle.frequency.as_ref();
        Some(CyclePrice {
            price: money.and_then(|m| m.value.clone()),
            currency: money.and_then(|m| m.currency_code.clone()),
            interval_unit: frequency.and_then(|f| f.interval_unit.clone()),
            interval_count: frequency.and_then(|f| f.interval_count),
        })
    }
}

/// Catalog product as reported by the provider
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderProduct {
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    /// Response body exactly as received
    #[serde(skip)]
    pub raw: serde_json::Value,
}
