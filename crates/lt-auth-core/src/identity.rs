//! Google ID token verification with JWKS caching

use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use moka::future::Cache;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::{AuthConfig, AuthError};

/// Issuer values Google puts in ID tokens
pub const GOOGLE_ISSUERS: [&str; 2] = ["accounts.google.com", "https://accounts.google.com"];

/// Identity attributes established by an identity provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedIdentity {
    #[serde(rename = "sub")]
    pub subject: String,
    pub email: Option<String>,
    #[serde(rename = "name")]
    pub display_name: Option<String>,
    #[serde(rename = "picture")]
    pub picture_url: Option<String>,
}

/// Checks an opaque sign-in credential and returns who it belongs to
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, credential: &str) -> Result<VerifiedIdentity, AuthError>;
}

/// JWKS (JSON Web Key Set) structure
#[derive(Debug, Clone, Deserialize)]
pub struct Jwks {
    pub keys: Vec<Jwk>,
}

/// Individual JWK (JSON Web Key)
#[derive(Debug, Clone, Deserialize)]
pub struct Jwk {
    pub kid: String,
    pub kty: String,
    pub alg: Option<String>,
    pub n: String,
    pub e: String,
}

/// Claims of a Google ID token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleIdClaims {
    pub sub: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub picture: Option<String>,
    pub iss: String,
    pub aud: String,
    pub iat: Option<i64>,
    pub exp: i64,
}

impl GoogleIdClaims {
    /// Check if the token is expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}

impl From<GoogleIdClaims> for VerifiedIdentity {
    fn from(claims: GoogleIdClaims) -> Self {
        Self {
            subject: claims.sub,
            email: claims.email,
            display_name: claims.name,
            picture_url: claims.picture,
        }
    }
}

/// Google ID token verifier
///
/// - Caches the full JWKS so a flood of unknown key IDs cannot force refetches
/// - Checks signature (RS256), issuer, audience and expiry
#[derive(Clone)]
pub struct GoogleIdentityVerifier {
    client_id: Option<String>,
    jwks_url: String,
    http_client: reqwest::Client,
    /// Cache of kid -> DecodingKey
    key_cache: Cache<String, Arc<DecodingKey>>,
    /// Known key IDs under the single key "jwks"
    jwks_kids_cache: Cache<String, Arc<Vec<String>>>,
}

impl GoogleIdentityVerifier {
    /// Create a verifier from the auth config
    pub fn new(config: &AuthConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(10))
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(2)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self::with_client(config, http_client)
    }

    /// Create a verifier sharing an existing HTTP client
    pub fn with_client(config: &AuthConfig, http_client: reqwest::Client) -> Self {
        let cache_duration = config.jwks_cache_duration;
        Self {
            client_id: config.google_client_id.clone(),
            jwks_url: config.google_jwks_url.clone(),
            http_client,
            key_cache: Cache::builder()
                .time_to_live(cache_duration)
                .max_capacity(100)
                .build(),
            jwks_kids_cache: Cache::builder()
                .time_to_live(cache_duration)
                .max_capacity(1)
                .build(),
        }
    }

    /// Validate a Google ID token and return its claims
    pub async fn validate(&self, id_token: &str) -> Result<GoogleIdClaims, AuthError> {
        let client_id = self
            .client_id
            .as_deref()
            .ok_or_else(|| AuthError::Configuration("GOOGLE_CLIENT_ID is not set".to_string()))?;

        let header = decode_header(id_token).map_err(|e| {
            tracing::debug!("Failed to decode ID token header: {}", e);
            AuthError::CredentialRejected("malformed token".to_string())
        })?;

        let kid = header.kid.ok_or_else(|| {
            tracing::debug!("ID token missing kid");
            AuthError::CredentialRejected("missing key id".to_string())
        })?;

        let decoding_key = self.get_key(&kid).await?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&GOOGLE_ISSUERS);
        validation.set_audience(&[client_id]);

        let token_data = decode::<GoogleIdClaims>(id_token, &decoding_key, &validation)
            .map_err(|e| {
                tracing::debug!("ID token validation failed: {}", e);
                AuthError::CredentialRejected(e.to_string())
            })?;

        let claims = token_data.claims;
        if claims.sub.is_empty() {
            return Err(AuthError::CredentialRejected("missing subject".to_string()));
        }

        Ok(claims)
    }

    /// Decoding key for `kid`, refetching the JWKS only for plausible ids
    async fn get_key(&self, kid: &str) -> Result<Arc<DecodingKey>, AuthError> {
        if let Some(key) = self.key_cache.get(kid).await {
            return Ok(key);
        }

        if let Some(known_kids) = self.jwks_kids_cache.get("jwks").await {
            if !known_kids.iter().any(|k| k == kid) {
                tracing::debug!("Unknown key ID '{}' not in cached JWKS", kid);
                return Err(AuthError::CredentialRejected("unknown key id".to_string()));
            }
        }

        let jwks = self.fetch_jwks().await?;

        let kids: Vec<String> = jwks.keys.iter().map(|k| k.kid.clone()).collect();
        self.jwks_kids_cache
            .insert("jwks".to_string(), Arc::new(kids))
            .await;

        for k in &jwks.keys {
            if let Ok(dk) = DecodingKey::from_rsa_components(&k.n, &k.e) {
                self.key_cache.insert(k.kid.clone(), Arc::new(dk)).await;
            }
        }

        self.key_cache.get(kid).await.ok_or_else(|| {
            tracing::debug!("Key not found in JWKS: {}", kid);
            AuthError::CredentialRejected("unknown key id".to_string())
        })
    }

    async fn fetch_jwks(&self) -> Result<Jwks, AuthError> {
        tracing::debug!("Fetching JWKS from {}", self.jwks_url);

        let response = self
            .http_client
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch JWKS: {}", e);
                AuthError::IdentityProviderUnavailable("failed to fetch JWKS".to_string())
            })?;

        if !response.status().is_success() {
            tracing::error!("JWKS fetch returned status: {}", response.status());
            return Err(AuthError::IdentityProviderUnavailable(format!(
                "JWKS endpoint returned {}",
                response.status()
            )));
        }

        response.json::<Jwks>().await.map_err(|e| {
            tracing::error!("Failed to parse JWKS: {}", e);
            AuthError::IdentityProviderUnavailable("failed to parse JWKS".to_string())
        })
    }

    /// Drop cached keys, forcing a JWKS fetch on next use
    pub fn invalidate_cache(&self) {
        self.key_cache.invalidate_all();
        self.jwks_kids_cache.invalidate_all();
    }
}

#[async_trait]
impl IdentityVerifier for GoogleIdentityVerifier {
    async fn verify(&self, credential: &str) -> Result<VerifiedIdentity, AuthError> {
        self.validate(credential).await.map(VerifiedIdentity::from)
    }
}

impl std::fmt::Debug for GoogleIdentityVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleIdentityVerifier")
            .field("client_id", &self.client_id)
            .field("jwks_url", &self.jwks_url)
            .finish_non_exhaustive()
    }
}
