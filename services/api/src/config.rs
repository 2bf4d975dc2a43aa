//! Configuration for the API service.

use lt_auth_core::{AdminAllowList, AuthConfig, DEFAULT_SESSION_TTL_MS};
use lt_billing_core::{BillingConfig, PayPalEnvironment};
use std::time::Duration;

/// Origin allowed by default outside production (Vite dev server)
pub const DEV_CORS_ORIGIN: &str = "http://localhost:5173";

/// API service configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub http_port: u16,
    /// Database URL
    pub database_url: String,
    /// Session and Google sign-in settings
    pub auth: AuthConfig,
    /// PayPal settings
    pub billing: BillingConfig,
    /// Allowed CORS origins; empty reflects any origin
    pub cors_origins: Vec<String>,
    /// Set the `Secure` attribute on the session cookie
    pub cookie_secure: bool,
    /// Request timeout
    pub request_timeout: Duration,
    /// Metrics enabled
    pub metrics_enabled: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from any key/value source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let first_set = |keys: &[&str]| {
            keys.iter()
                .filter_map(|k| lookup(*k))
                .map(|v| v.trim().to_string())
                .find(|v| !v.is_empty())
        };

        // Database
        let database_url = first_set(&["DATABASE_URL"]).ok_or(ConfigError::Missing("DATABASE_URL"))?;

        // Server
        let http_port = first_set(&["PORT", "HTTP_PORT"])
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let request_timeout_secs: u64 = first_set(&["REQUEST_TIMEOUT_SECS"])
            .unwrap_or_else(|| "30".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("REQUEST_TIMEOUT_SECS"))?;

        let metrics_enabled = first_set(&["METRICS_ENABLED"])
            .and_then(|v| v.parse().ok())
            .unwrap_or(true);

        // Sessions; an unparsable TTL falls back to the default
        let session_secret = first_set(&["AUTH_SESSION_SECRET", "SESSION_SECRET", "COOKIE_SECRET"]);
        let session_ttl_ms = first_set(&["AUTH_SESSION_TTL_MS"])
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(DEFAULT_SESSION_TTL_MS);
        let google_client_id = first_set(&["GOOGLE_CLIENT_ID", "VITE_GOOGLE_CLIENT_ID"]);
        let admin_emails = AdminAllowList::from_csv(&lookup("ADMIN_EMAILS").unwrap_or_default());

        let auth = AuthConfig::new(session_secret, google_client_id)
            .with_session_ttl_ms(session_ttl_ms)
            .with_admin_emails(admin_emails);

        // Browser-facing settings
        let production = lookup("NODE_ENV").as_deref() == Some("production");
        let cookie_secure = production || lookup("COOKIE_SECURE").as_deref() == Some("true");

        let mut cors_origins: Vec<String> = Vec::new();
        for raw in [lookup("CORS_ORIGIN"), lookup("CORS_ORIGINS")].into_iter().flatten() {
            for origin in raw.split(',').map(str::trim).filter(|o| !o.is_empty()) {
                if !cors_origins.iter().any(|o| o == origin) {
                    cors_origins.push(origin.to_string());
                }
            }
        }
        if cors_origins.is_empty() && !production {
            cors_origins.push(DEV_CORS_ORIGIN.to_string());
        }

        // PayPal
        let billing = BillingConfig::new(
            first_set(&["PAYPAL_CLIENT_ID"]),
            first_set(&["PAYPAL_CLIENT_SECRET"]),
        )
        .with_environment(PayPalEnvironment::parse(
            &lookup("PAYPAL_ENV").unwrap_or_default(),
        ));

        Ok(Self {
            http_port,
            database_url,
            auth,
            billing,
            cors_origins,
            cookie_secure,
            request_timeout: Duration::from_secs(request_timeout_secs),
            metrics_enabled,
        })
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
