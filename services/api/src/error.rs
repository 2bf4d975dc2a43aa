//! Error types for the API service.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use lt_auth_core::AuthError;
use lt_billing_core::BillingError;

use crate::metrics;

/// API error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// API error type
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Authentication required")]
    Unauthenticated,

    #[error("Admin access required")]
    Forbidden,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid credential")]
    CredentialRejected(String),

    #[error("Upstream service unavailable")]
    Upstream(String),

    #[error("Internal error")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthenticated | Self::CredentialRejected(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::Configuration(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::Forbidden => "FORBIDDEN",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::CredentialRejected(_) => "INVALID_CREDENTIAL",
            Self::Upstream(_) => "UPSTREAM_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();

        match &self {
            Self::Configuration(_) | Self::Upstream(_) | Self::Internal(_) => {
                tracing::error!(error = ?self, "API error");
            }
            Self::CredentialRejected(reason) => {
                tracing::debug!(reason = %reason, "Credential rejected");
            }
            _ => {}
        }

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
                details: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Unauthenticated => Self::Unauthenticated,
            AuthError::Forbidden => Self::Forbidden,
            AuthError::CredentialRejected(reason) => {
                metrics::record_login_failure("credential_rejected");
                Self::CredentialRejected(reason)
            }
            AuthError::IdentityProviderUnavailable(reason) => {
                metrics::record_login_failure("provider_unavailable");
                Self::Upstream(reason)
            }
            AuthError::Configuration(reason) => Self::Configuration(reason),
            AuthError::Internal(reason) => Self::Internal(reason),
        }
    }
}

impl From<BillingError> for ApiError {
    fn from(err: BillingError) -> Self {
        match err {
            BillingError::Configuration(reason) => Self::Configuration(reason),
            BillingError::InvalidInput(reason) | BillingError::InvalidPlan(reason) => {
                Self::BadRequest(reason)
            }
            e @ (BillingError::SubscriptionNotFound
            | BillingError::PlanNotFound
            | BillingError::ProductNotFound) => Self::NotFound(capitalize(&e.to_string())),
            BillingError::ProviderError(reason) => Self::Upstream(reason),
            BillingError::Database(e) => Self::Internal(e.to_string()),
            BillingError::Internal(reason) => Self::Internal(reason),
        }
    }
}

fn capitalize(message: &str) -> String {
    let mut chars = message.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
