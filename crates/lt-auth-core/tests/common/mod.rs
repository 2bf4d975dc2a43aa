//! Shared fixtures for lt-auth-core integration tests

pub mod google_mock;

#[allow(unused_imports)]
pub use google_mock::{GoogleJwksServer, TestGoogleClaims, TestKeyPair, TEST_CLIENT_ID};
