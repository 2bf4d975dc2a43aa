//! Configuration types for the auth core

use std::collections::HashSet;
use std::time::Duration;

/// Issuer stamped into every session token. Tokens carrying any other
/// value are rejected.
pub const SESSION_ISSUER: &str = "logintemplate";

/// Cookie holding the session token
pub const SESSION_COOKIE_NAME: &str = "lt_auth";

/// Default session lifetime: 7 days
pub const DEFAULT_SESSION_TTL_MS: i64 = 1000 * 60 * 60 * 24 * 7;

/// Google's published signing keys
pub const GOOGLE_JWKS_URL: &str = "https://www.googleapis.com/oauth2/v3/certs";

/// Auth configuration, built once at process start
#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC secret for session signing. `None` disables issuance and makes
    /// every token fail verification.
    pub session_secret: Option<String>,
    /// Session lifetime in milliseconds
    pub session_ttl_ms: i64,
    /// Name of the cookie carrying the token
    pub cookie_name: String,
    /// Google OAuth client ID (expected `aud` of Google ID tokens)
    pub google_client_id: Option<String>,
    /// JWKS endpoint for Google ID token keys
    pub google_jwks_url: String,
    /// JWKS cache duration
    pub jwks_cache_duration: Duration,
    /// Emails granted admin access
    pub admin_emails: AdminAllowList,
}

impl AuthConfig {
    /// Create a new auth config. Empty secrets and client ids count as absent.
    pub fn new(session_secret: Option<String>, google_client_id: Option<String>) -> Self {
        Self {
            session_secret: session_secret.filter(|s| !s.is_empty()),
            session_ttl_ms: DEFAULT_SESSION_TTL_MS,
            cookie_name: SESSION_COOKIE_NAME.to_string(),
            google_client_id: google_client_id.filter(|s| !s.is_empty()),
            google_jwks_url: GOOGLE_JWKS_URL.to_string(),
            jwks_cache_duration: Duration::from_secs(60 * 60),
            admin_emails: AdminAllowList::default(),
        }
    }

    /// Set session lifetime in milliseconds
    pub fn with_session_ttl_ms(mut self, ttl_ms: i64) -> Self {
        self.session_ttl_ms = ttl_ms;
        self
    }

    /// Set the admin allow-list
    pub fn with_admin_emails(mut self, admins: AdminAllowList) -> Self {
        self.admin_emails = admins;
        self
    }

    /// Point JWKS fetching at another endpoint (tests, proxies)
    pub fn with_jwks_url_override(mut self, url: impl Into<String>) -> Self {
        self.google_jwks_url = url.into();
        self
    }

    /// Set JWKS cache duration
    pub fn with_jwks_cache_duration(mut self, duration: Duration) -> Self {
        self.jwks_cache_duration = duration;
        self
    }

    /// Whether Google sign-in can be used
    pub fn google_auth_configured(&self) -> bool {
        self.google_client_id.is_some()
    }

    /// Cookie max-age matching the token TTL, in whole seconds
    pub fn cookie_max_age_secs(&self) -> i64 {
        (self.session_ttl_ms / 1000).max(0)
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("session_secret_set", &self.session_secret.is_some())
            .field("session_ttl_ms", &self.session_ttl_ms)
            .field("cookie_name", &self.cookie_name)
            .field("google_client_id", &self.google_client_id)
            .field("google_jwks_url", &self.google_jwks_url)
            .field("admin_count", &self.admin_emails.len())
            .finish()
    }
}

/// Case-insensitive set of admin emails.
///
/// An empty list grants admin to nobody.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminAllowList {
    emails: HashSet<String>,
}

impl AdminAllowList {
    /// Build from any list of emails; blanks are skipped
    pub fn new<I, S>(emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let emails = emails
            .into_iter()
            .map(|e| e.as_ref().trim().to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        Self { emails }
    }

    /// Parse a comma separated list (the `ADMIN_EMAILS` format)
    pub fn from_csv(raw: &str) -> Self {
        Self::new(raw.split(','))
    }

    /// Case-insensitive membership
    pub fn contains(&self, email: &str) -> bool {
        !self.emails.is_empty() && self.emails.contains(&email.trim().to_lowercase())
    }

    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }

    pub fn len(&self) -> usize {
        self.emails.len()
    }
}
