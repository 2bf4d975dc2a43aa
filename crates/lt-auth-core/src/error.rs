//! Auth errors

use thiserror::Error;

/// Authentication errors
///
/// A malformed, tampered or expired session token is not an error: the codec
/// reports it as `None`. These variants cover the faults a caller has to
/// surface at the HTTP boundary.
#[derive(Error, Debug)]
pub enum AuthError {
    /// No valid session token present
    #[error("authentication required")]
    Unauthenticated,

    /// Valid session but not an admin
    #[error("admin access required")]
    Forbidden,

    /// Identity credential failed verification
    #[error("invalid identity credential: {0}")]
    CredentialRejected(String),

    /// Identity provider could not be reached or returned garbage
    #[error("identity provider unavailable: {0}")]
    IdentityProviderUnavailable(String),

    /// Signing secret or client id missing
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Unauthenticated | Self::CredentialRejected(_) => 401,
            Self::Forbidden => 403,
            Self::IdentityProviderUnavailable(_) => 502,
            Self::Configuration(_) | Self::Internal(_) => 500,
        }
    }

    /// Get error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::Forbidden => "FORBIDDEN",
            Self::CredentialRejected(_) => "INVALID_CREDENTIAL",
            Self::IdentityProviderUnavailable(_) => "IDENTITY_PROVIDER_UNAVAILABLE",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether the fault is on the server side
    pub fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }
}
