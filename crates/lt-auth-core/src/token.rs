//! Compact signed session tokens
//!
//! Wire format:
//!
//! ```text
//! base64url(payload_json) "." base64url(hmac_sha256(secret, payload_json))
//! ```
//!
//! Base64 is the URL-safe alphabet without padding on output; padded input
//! is accepted on decode. The MAC covers the exact JSON bytes, so nothing in
//! the payload is looked at before the signature checks out.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, URL_SAFE_NO_PAD};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::config::{AuthConfig, SESSION_ISSUER};
use crate::crypto::HmacKey;
use crate::identity::VerifiedIdentity;
use crate::AuthError;

/// Segment separator
const SEPARATOR: char = '.';

/// URL-safe decoder that tolerates both padded and unpadded segments
const URL_SAFE_ANY_PADDING: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Payload carried inside a session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Stable identifier of the principal
    #[serde(rename = "sub")]
    pub subject: String,
    pub email: Option<String>,
    #[serde(rename = "name")]
    pub display_name: Option<String>,
    #[serde(rename = "picture")]
    pub picture_url: Option<String>,
    /// Always [`SESSION_ISSUER`] on a verified token
    #[serde(rename = "iss")]
    pub issuer: String,
    /// Expiry, milliseconds since the Unix epoch
    #[serde(rename = "exp")]
    pub expires_at_millis: i64,
}

impl SessionClaims {
    /// Identity attributes without issuer and expiry
    pub fn identity(&self) -> VerifiedIdentity {
        VerifiedIdentity {
            subject: self.subject.clone(),
            email: self.email.clone(),
            display_name: self.display_name.clone(),
            picture_url: self.picture_url.clone(),
        }
    }

    /// Best label for messages: email, then subject
    pub fn label(&self) -> &str {
        self.email
            .as_deref()
            .filter(|e| !e.is_empty())
            .unwrap_or(&self.subject)
    }
}

/// Issues and verifies session tokens with one secret.
///
/// Cheap to clone; every clone shares the key.
#[derive(Clone)]
pub struct TokenCodec {
    key: Option<HmacKey>,
    ttl_millis: i64,
}

impl TokenCodec {
    /// Create a codec. An empty or missing secret leaves the codec unable to
    /// issue and makes every verification fail.
    pub fn new(secret: Option<&str>, ttl_millis: i64) -> Self {
        let key = secret.and_then(|s| HmacKey::new(s).ok());
        Self { key, ttl_millis }
    }

    /// Create a codec from the auth config
    pub fn from_config(config: &AuthConfig) -> Self {
        let codec = Self::new(config.session_secret.as_deref(), config.session_ttl_ms);
        match &codec.key {
            Some(key) if key.is_weak() => tracing::warn!(
                recommended = HmacKey::RECOMMENDED_KEY_LENGTH,
                "Session secret is shorter than recommended"
            ),
            Some(_) => {}
            None => tracing::warn!("No session secret configured; sign-in is disabled"),
        }
        codec
    }

    /// Whether a signing secret is configured
    pub fn has_secret(&self) -> bool {
        self.key.is_some()
    }

    /// Configured token lifetime in milliseconds
    pub fn ttl_millis(&self) -> i64 {
        self.ttl_millis
    }

    /// Issue a token for a verified identity with the configured TTL
    pub fn issue(&self, identity: &VerifiedIdentity) -> Result<String, AuthError> {
        self.issue_at(identity, self.ttl_millis, now_millis())
    }

    /// Issue a token with an explicit TTL
    pub fn issue_with_ttl(
        &self,
        identity: &VerifiedIdentity,
        ttl_millis: i64,
    ) -> Result<String, AuthError> {
        self.issue_at(identity, ttl_millis, now_millis())
    }

    /// Issue a token as if the clock read `now_millis`.
    ///
    /// Issuer and expiry are always set here, never taken from the caller.
    pub fn issue_at(
        &self,
        identity: &VerifiedIdentity,
        ttl_millis: i64,
        now_millis: i64,
    ) -> Result<String, AuthError> {
        if identity.subject.is_empty() {
            return Err(AuthError::CredentialRejected(
                "identity has no subject".to_string(),
            ));
        }

        let claims = SessionClaims {
            subject: identity.subject.clone(),
            email: identity.email.clone(),
            display_name: identity.display_name.clone(),
            picture_url: identity.picture_url.clone(),
            issuer: SESSION_ISSUER.to_string(),
            expires_at_millis: now_millis.saturating_add(ttl_millis),
        };

        let payload = serde_json::to_vec(&claims).map_err(|e| {
            tracing::error!("Failed to serialize session claims: {}", e);
            AuthError::Internal("Failed to create session".to_string())
        })?;

        self.seal(&payload)
    }

    /// Sign arbitrary payload bytes into the token format.
    ///
    /// [`issue`](Self::issue) is the normal entry point; this exists for
    /// tooling that needs to mint raw payloads.
    pub fn seal(&self, payload: &[u8]) -> Result<String, AuthError> {
        let key = self.key.as_ref().ok_or_else(|| {
            AuthError::Configuration("missing AUTH_SESSION_SECRET for session signing".to_string())
        })?;

        let signature = key.sign(payload);
        Ok(format!(
            "{}{SEPARATOR}{}",
            URL_SAFE_NO_PAD.encode(payload),
            URL_SAFE_NO_PAD.encode(signature)
        ))
    }

    /// Verify a token against the current clock
    pub fn verify(&self, token: &str) -> Option<SessionClaims> {
        self.verify_at(token, now_millis())
    }

    /// Verify a token as if the clock read `now_millis`.
    ///
    /// Every failure collapses to `None`.
    pub fn verify_at(&self, token: &str, now_millis: i64) -> Option<SessionClaims> {
        let key = self.key.as_ref()?;
        if token.is_empty() {
            return None;
        }

        let mut segments = token.split(SEPARATOR);
        let (Some(payload_b64), Some(signature_b64), None) =
            (segments.next(), segments.next(), segments.next())
        else {
            tracing::trace!("Session token does not have two segments");
            return None;
        };

        let payload = URL_SAFE_ANY_PADDING.decode(payload_b64).ok()?;
        let signature = URL_SAFE_ANY_PADDING.decode(signature_b64).ok()?;

        // Signature first: no payload byte is interpreted before this passes
        if !key.verify(&payload, &signature) {
            tracing::trace!("Session token signature mismatch");
            return None;
        }

        let claims: SessionClaims = serde_json::from_slice(&payload).ok()?;

        if claims.issuer != SESSION_ISSUER {
            tracing::trace!("Session token issuer mismatch");
            return None;
        }

        // Zero expiry is treated as missing
        if claims.expires_at_millis == 0 || claims.expires_at_millis < now_millis {
            tracing::trace!("Session token expired");
            return None;
        }

        Some(claims)
    }
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("key", &self.key)
            .field("ttl_millis", &self.ttl_millis)
            .finish()
    }
}

/// Current wall-clock time in milliseconds since the epoch
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}
