//! Shared fixtures for lt-billing-core integration tests

pub mod mock_repo;
pub mod paypal_mock;

#[allow(unused_imports)]
pub use mock_repo::MockSubscriptionRepository;
#[allow(unused_imports)]
pub use paypal_mock::{
    plan_json, PayPalMockServer, PLAN_ID, PRODUCT_ID, SUBSCRIPTION_ID, TEST_ACCESS_TOKEN,
};
