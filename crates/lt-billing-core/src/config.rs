//! Billing configuration

use std::time::Duration;

/// PayPal REST base for the sandbox
pub const PAYPAL_SANDBOX_API_BASE: &str = "https://api-m.sandbox.paypal.com";

/// PayPal REST base for live traffic
pub const PAYPAL_LIVE_API_BASE: &str = "https://api-m.paypal.com";

/// Which PayPal environment to talk to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PayPalEnvironment {
    #[default]
    Sandbox,
    Live,
}

impl PayPalEnvironment {
    /// `live` (any case) selects live; anything else is sandbox
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("live") {
            Self::Live
        } else {
            Self::Sandbox
        }
    }

    pub fn api_base(&self) -> &'static str {
        match self {
            Self::Sandbox => PAYPAL_SANDBOX_API_BASE,
            Self::Live => PAYPAL_LIVE_API_BASE,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sandbox => "sandbox",
            Self::Live => "live",
        }
    }
}

/// Billing service configuration
#[derive(Clone)]
pub struct BillingConfig {
    /// PayPal REST client id
    pub client_id: Option<String>,
    /// PayPal REST client secret
    pub client_secret: Option<String>,
    pub environment: PayPalEnvironment,
    /// Replaces the environment's API base (tests, proxies)
    pub api_base_override: Option<String>,
    /// Access tokens are dropped this long before PayPal says they expire
    pub token_refresh_margin: Duration,
    pub request_timeout: Duration,
}

impl BillingConfig {
    /// Create a new billing config. Empty values count as absent.
    pub fn new(client_id: Option<String>, client_secret: Option<String>) -> Self {
        Self {
            client_id: client_id.filter(|s| !s.is_empty()),
            client_secret: client_secret.filter(|s| !s.is_empty()),
            environment: PayPalEnvironment::default(),
            api_base_override: None,
            token_refresh_margin: Duration::from_secs(60),
            request_timeout: Duration::from_secs(15),
        }
    }

    pub fn with_environment(mut self, environment: PayPalEnvironment) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_api_base_override(mut self, base: impl Into<String>) -> Self {
        self.api_base_override = Some(base.into());
        self
    }

    pub fn with_token_refresh_margin(mut self, margin: Duration) -> Self {
        self.token_refresh_margin = margin;
        self
    }

    /// API base without trailing slash
    pub fn api_base(&self) -> &str {
        self.api_base_override
            .as_deref()
            .unwrap_or_else(|| self.environment.api_base())
            .trim_end_matches('/')
    }

    /// Client id and secret, when both are set
    pub fn credentials(&self) -> Option<(&str, &str)> {
        Some((self.client_id.as_deref()?, self.client_secret.as_deref()?))
    }

    pub fn is_configured(&self) -> bool {
        self.credentials().is_some()
    }
}

impl std::fmt::Debug for BillingConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BillingConfig")
            .field("client_id", &self.client_id)
            .field("client_secret_set", &self.client_secret.is_some())
            .field("environment", &self.environment)
            .field("api_base", &self.api_base())
            .finish()
    }
}
