//! Session gate: request-level policy on top of the token codec
//!
//! Sessions are stateless. Nothing is stored server-side, so logout means
//! telling the client to drop its cookie; a captured token stays valid until
//! it expires.

use std::collections::HashMap;
use std::hash::BuildHasher;
use std::sync::Arc;

use crate::config::{AdminAllowList, AuthConfig};
use crate::token::{SessionClaims, TokenCodec};
use crate::AuthError;

/// Something that holds the session token in a named slot (cookie jar,
/// header map, test fixture).
pub trait TokenCarrier {
    /// Value stored under `name`, if any
    fn read(&self, name: &str) -> Option<String>;
}

impl<S: BuildHasher> TokenCarrier for HashMap<String, String, S> {
    fn read(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl<T: TokenCarrier + ?Sized> TokenCarrier for &T {
    fn read(&self, name: &str) -> Option<String> {
        (**self).read(name)
    }
}

/// Turns carriers into sessions and sessions into roles
#[derive(Clone)]
pub struct SessionGate {
    codec: TokenCodec,
    admins: Arc<AdminAllowList>,
    slot: Arc<str>,
}

impl SessionGate {
    /// Create a gate reading tokens from the slot called `slot`
    pub fn new(codec: TokenCodec, admins: AdminAllowList, slot: impl Into<Arc<str>>) -> Self {
        Self {
            codec,
            admins: Arc::new(admins),
            slot: slot.into(),
        }
    }

    /// Build codec and gate from the auth config
    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(
            TokenCodec::from_config(config),
            config.admin_emails.clone(),
            config.cookie_name.as_str(),
        )
    }

    /// The codec used for issuing and verifying
    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Name of the carrier slot
    pub fn slot(&self) -> &str {
        &self.slot
    }

    /// Verified session from the carrier, if any
    pub fn current_session<C: TokenCarrier + ?Sized>(&self, carrier: &C) -> Option<SessionClaims> {
        let token = carrier.read(&self.slot)?;
        self.codec.verify(&token)
    }

    /// Verified session or [`AuthError::Unauthenticated`]
    pub fn require_session<C: TokenCarrier + ?Sized>(
        &self,
        carrier: &C,
    ) -> Result<SessionClaims, AuthError> {
        self.current_session(carrier).ok_or(AuthError::Unauthenticated)
    }

    /// Whether the session belongs to an admin.
    ///
    /// False for no session, no email, or an empty allow-list.
    pub fn is_admin(&self, claims: Option<&SessionClaims>) -> bool {
        claims
            .and_then(|c| c.email.as_deref())
            .is_some_and(|email| self.admins.contains(email))
    }

    /// Verified admin session; 401 without a session, 403 for non-admins
    pub fn require_admin<C: TokenCarrier + ?Sized>(
        &self,
        carrier: &C,
    ) -> Result<SessionClaims, AuthError> {
        let claims = self.require_session(carrier)?;
        if !self.is_admin(Some(&claims)) {
            tracing::debug!(subject = %claims.subject, "Admin access denied");
            return Err(AuthError::Forbidden);
        }
        Ok(claims)
    }
}

impl std::fmt::Debug for SessionGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionGate")
            .field("slot", &self.slot)
            .field("admin_count", &self.admins.len())
            .finish_non_exhaustive()
    }
}
