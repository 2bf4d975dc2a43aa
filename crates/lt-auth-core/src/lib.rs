//! Logintemplate Auth Core - Session authentication logic
//!
//! Stateless signed session tokens, the request-level session gate
//! (authenticated vs admin), and Google ID token verification.

pub mod config;
pub mod crypto;
pub mod error;
pub mod identity;
pub mod session;
pub mod token;

pub use config::*;
pub use crypto::{constant_time_eq, HmacKey, HmacKeyError};
pub use error::*;
pub use identity::{GoogleIdClaims, GoogleIdentityVerifier, IdentityVerifier, VerifiedIdentity};
pub use session::{SessionGate, TokenCarrier};
pub use token::{SessionClaims, TokenCodec};
