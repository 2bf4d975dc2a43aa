//! PayPal REST provider
//!
//! OAuth client-credentials tokens are cached until shortly before PayPal
//! says they expire; every API call reuses the cached token.

use async_trait::async_trait;
use moka::future::Cache;
use moka::Expiry;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, instrument};

use crate::config::BillingConfig;
use crate::error::BillingError;
use crate::provider::{PaymentProvider, ProviderPlan, ProviderProduct, ProviderSubscription};

const TOKEN_CACHE_KEY: &str = "paypal";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    /// Lifetime in seconds
    expires_in: u64,
}

struct AccessToken {
    value: String,
    ttl: Duration,
}

/// Each token lives as long as PayPal granted, minus the refresh margin
struct TokenExpiry;

impl Expiry<String, Arc<AccessToken>> for TokenExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &Arc<AccessToken>,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// PayPal payment provider
#[derive(Clone)]
pub struct PayPalProvider {
    client: Client,
    config: BillingConfig,
    token_cache: Cache<String, Arc<AccessToken>>,
}

impl PayPalProvider {
    /// Create a new PayPal provider
    pub fn new(config: BillingConfig) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(config.request_timeout)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self::with_client(config, client)
    }

    /// Create a provider sharing an existing HTTP client
    pub fn with_client(config: BillingConfig, client: Client) -> Self {
        Self {
            client,
            config,
            token_cache: Cache::builder()
                .max_capacity(1)
                .expire_after(TokenExpiry)
                .build(),
        }
    }

    pub fn config(&self) -> &BillingConfig {
        &self.config
    }

    /// Bearer token for API calls, fetched on cache miss
    async fn access_token(&self) -> Result<String, BillingError> {
        let (client_id, client_secret) = self.config.credentials().ok_or_else(|| {
            BillingError::Configuration(
                "PAYPAL_CLIENT_ID and PAYPAL_CLIENT_SECRET must be set".to_string(),
            )
        })?;

        if let Some(token) = self.token_cache.get(TOKEN_CACHE_KEY).await {
            return Ok(token.value.clone());
        }

        let url = format!("{}/v1/oauth2/token", self.config.api_base());
        debug!(
            environment = self.config.environment.as_str(),
            "Fetching PayPal access token"
        );

        let response = self
            .client
            .post(&url)
            .basic_auth(client_id, Some(client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "PayPal token request failed");
                BillingError::ProviderError(e.to_string())
            })?;

        if !response.status().is_success() {
            let status = response.status();
            error!(status = %status, "PayPal rejected client credentials");
            return Err(BillingError::ProviderError(format!(
                "PayPal token endpoint returned {status}"
            )));
        }

        let body: TokenResponse = response.json().await.map_err(|e| {
            error!(error = %e, "Failed to parse PayPal token response");
            BillingError::ProviderError("malformed token response".to_string())
        })?;

        let token = Arc::new(AccessToken {
            value: body.access_token,
            ttl: Duration::from_secs(body.expires_in)
                .saturating_sub(self.config.token_refresh_margin),
        });
        self.token_cache
            .insert(TOKEN_CACHE_KEY.to_string(), Arc::clone(&token))
            .await;

        Ok(token.value.clone())
    }

    /// Authenticated GET returning the raw JSON body.
    ///
    /// 404 maps to `not_found`; 401 drops the cached token so the next call
    /// fetches a fresh one.
    async fn paypal_get(
        &self,
        endpoint: &str,
        not_found: BillingError,
    ) -> Result<serde_json::Value, BillingError> {
        let token = self.access_token().await?;
        let url = format!("{}{endpoint}", self.config.api_base());

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "PayPal API request failed");
                BillingError::ProviderError(e.to_string())
            })?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::NOT_FOUND => return Err(not_found),
            status => {
                if status == StatusCode::UNAUTHORIZED {
                    self.token_cache.invalidate_all();
                }
                let error_body = response.text().await.unwrap_or_default();
                error!(status = %status, body = %error_body, "PayPal API error");
                return Err(BillingError::ProviderError(format!(
                    "PayPal API error: {status}"
                )));
            }
        }

        response.json::<serde_json::Value>().await.map_err(|e| {
            error!(error = %e, "Failed to parse PayPal response");
            BillingError::ProviderError("malformed PayPal response".to_string())
        })
    }
}

fn parse<T: serde::de::DeserializeOwned>(
    raw: serde_json::Value,
    what: &str,
) -> Result<T, BillingError> {
    serde_json::from_value(raw).map_err(|e| {
        error!(error = %e, "Unexpected PayPal {} shape", what);
        BillingError::ProviderError(format!("unexpected {what} response"))
    })
}

#[async_trait]
impl PaymentProvider for PayPalProvider {
    #[instrument(skip(self))]
    async fn get_subscription(
        &self,
        subscription_id: &str,
    ) -> Result<ProviderSubscription, BillingError> {
        debug!("Getting PayPal subscription");
        let raw = self
            .paypal_get(
                &format!("/v1/billing/subscriptions/{subscription_id}"),
                BillingError::SubscriptionNotFound,
            )
            .await?;
        parse(raw, "subscription")
    }

    #[instrument(skip(self))]
    async fn get_plan(&self, plan_id: &str) -> Result<ProviderPlan, BillingError> {
        debug!("Getting PayPal plan");
        let raw = self
            .paypal_get(
                &format!("/v1/billing/plans/{plan_id}"),
                BillingError::PlanNotFound,
            )
            .await?;
        let mut plan: ProviderPlan = parse(raw.clone(), "plan")?;
        plan.raw = raw;
        Ok(plan)
    }

    #[instrument(skip(self))]
    async fn get_product(&self, product_id: &str) -> Result<ProviderProduct, BillingError> {
        debug!("Getting PayPal product");
        let raw = self
            .paypal_get(
                &format!("/v1/catalogs/products/{product_id}"),
                BillingError::ProductNotFound,
            )
            .await?;
        let mut product: ProviderProduct = parse(raw.clone(), "product")?;
        product.raw = raw;
        Ok(product)
    }
}

impl std::fmt::Debug for PayPalProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PayPalProvider")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
