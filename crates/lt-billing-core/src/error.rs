//! Billing errors

use thiserror::Error;

/// Billing errors
#[derive(Error, Debug)]
pub enum BillingError {
    /// PayPal credentials missing
    #[error("billing not configured: {0}")]
    Configuration(String),

    /// Caller supplied an unusable id or payload
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Subscription not found at the provider
    #[error("subscription not found")]
    SubscriptionNotFound,

    /// Plan not found at the provider
    #[error("plan not found")]
    PlanNotFound,

    /// Product not found at the provider
    #[error("product not found")]
    ProductNotFound,

    /// Plan exists but cannot be recorded
    #[error("invalid plan: {0}")]
    InvalidPlan(String),

    /// Payment provider error
    #[error("provider error: {0}")]
    ProviderError(String),

    /// Database error
    #[error("database error: {0}")]
    Database(#[from] lt_db::DbError),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl BillingError {
    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::SubscriptionNotFound | Self::PlanNotFound | Self::ProductNotFound
        )
    }

    /// Check if this is a provider error
    pub fn is_provider_error(&self) -> bool {
        matches!(self, Self::ProviderError(_))
    }
}
