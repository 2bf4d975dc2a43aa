//! lt-billing-core - subscription billing on PayPal
//!
//! Looks up subscriptions and plans at PayPal and records them through the
//! `lt-db` repositories.
//!
//! # Example
//!
//! ```rust,ignore
//! use lt_billing_core::{BillingConfig, BillingService, PayPalProvider};
//! use lt_db::Repositories;
//!
//! let config = BillingConfig::new(Some(client_id), Some(client_secret));
//! let provider = PayPalProvider::new(config);
//! let billing = BillingService::new(Arc::new(repos.subscriptions), Arc::new(provider));
//!
//! let signup = billing.record_signup("I-BW452GLLEP1G", &subscriber).await?;
//! ```

pub mod config;
pub mod error;
pub mod paypal;
pub mod provider;
pub mod service;

pub use config::{BillingConfig, PayPalEnvironment};
pub use error::BillingError;
pub use paypal::PayPalProvider;
pub use provider::{
    BillingCycle, CyclePrice, PaymentProvider, ProviderPlan, ProviderProduct,
    ProviderSubscription,
};
pub use service::{BillingService, Subscriber};
