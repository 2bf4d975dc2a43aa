//! Application state shared by all handlers.

use std::sync::Arc;
use std::time::Duration;

use lt_auth_core::{IdentityVerifier, SessionGate};
use lt_billing_core::{BillingService, PaymentProvider};
use lt_db::SubscriptionRepository;

use crate::config::Config;

/// Billing service over type-erased repository and provider
pub type DynBilling = BillingService<dyn SubscriptionRepository, dyn PaymentProvider>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Session token policy
    pub gate: SessionGate,
    /// Google ID token verifier
    pub identity: Arc<dyn IdentityVerifier>,
    /// Signup and plan recording
    pub billing: Arc<DynBilling>,
    /// Configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Create new application state
    pub fn new(
        gate: SessionGate,
        identity: Arc<dyn IdentityVerifier>,
        billing: DynBilling,
        config: Config,
    ) -> Self {
        Self {
            gate,
            identity,
            billing: Arc::new(billing),
            config: Arc::new(config),
        }
    }

    /// Get request timeout
    pub fn request_timeout(&self) -> Duration {
        self.config.request_timeout
    }
}
