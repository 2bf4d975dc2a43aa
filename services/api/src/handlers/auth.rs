//! Authentication handlers (config, me, Google sign-in, logout, guarded pages)

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_extra::extract::CookieJar;
use serde::Serialize;
use time::Duration as TimeDuration;

use lt_auth_core::{AuthError, SessionClaims, VerifiedIdentity};

use crate::error::{ApiError, ApiResult};
use crate::extractors::{MaybeSession, RequireAdmin, RequireSession};
use crate::metrics;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthConfigResponse {
    pub google_auth_configured: bool,
    pub google_client_id: Option<String>,
    pub session_ttl_ms: i64,
}

/// Identity fields exposed to the browser
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub sub: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub picture: Option<String>,
}

impl From<VerifiedIdentity> for UserInfo {
    fn from(identity: VerifiedIdentity) -> Self {
        Self {
            sub: identity.subject,
            email: identity.email,
            name: identity.display_name,
            picture: identity.picture_url,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
}

impl SessionResponse {
    fn anonymous() -> Self {
        Self {
            authenticated: false,
            user: None,
            issuer: None,
            expires_at: None,
        }
    }

    fn from_claims(claims: SessionClaims) -> Self {
        Self {
            authenticated: true,
            user: Some(claims.identity().into()),
            expires_at: Some(claims.expires_at_millis),
            issuer: Some(claims.issuer),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct AdminResponse {
    pub admin: bool,
    pub email: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// Public sign-in settings for the browser
pub async fn auth_config(State(state): State<AppState>) -> Json<AuthConfigResponse> {
    let auth = &state.config.auth;
    Json(AuthConfigResponse {
        google_auth_configured: auth.google_auth_configured(),
        google_client_id: auth.google_client_id.clone(),
        session_ttl_ms: auth.session_ttl_ms,
    })
}

/// Current session, if any
pub async fn me(MaybeSession(session): MaybeSession) -> Json<SessionResponse> {
    Json(match session {
        Some(claims) => SessionResponse::from_claims(claims),
        None => SessionResponse::anonymous(),
    })
}

/// Exchange a Google ID token for a session cookie
pub async fn google_login(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> ApiResult<(CookieJar, Json<SessionResponse>)> {
    if !state.config.auth.google_auth_configured() {
        return Err(AuthError::Configuration("Google auth not configured".to_string()).into());
    }
    if !state.gate.codec().has_secret() {
        return Err(AuthError::Configuration("Missing AUTH_SESSION_SECRET".to_string()).into());
    }

    let credential = body
        .ok()
        .and_then(|Json(value)| {
            value
                .get("credential")
                .and_then(|c| c.as_str())
                .map(str::to_string)
        })
        .filter(|c| !c.is_empty())
        .ok_or_else(|| {
            metrics::record_login_failure("missing_credential");
            ApiError::BadRequest("Missing Google credential".to_string())
        })?;

    let identity = state.identity.verify(&credential).await?;
    let token = state.gate.codec().issue(&identity)?;
    metrics::record_session_issued();

    tracing::info!(subject = %identity.subject, "Session issued");

    let cookie = Cookie::build((state.gate.slot().to_string(), token))
        .path("/")
        .http_only(true)
        .secure(state.config.cookie_secure)
        .same_site(SameSite::Lax)
        .max_age(TimeDuration::seconds(state.config.auth.cookie_max_age_secs()));

    Ok((
        jar.add(cookie),
        Json(SessionResponse {
            authenticated: true,
            user: Some(identity.into()),
            issuer: None,
            expires_at: None,
        }),
    ))
}

/// Tell the browser to drop the session cookie
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Json<SessionResponse>) {
    let remove_session = Cookie::build((state.gate.slot().to_string(), ""))
        .path("/")
        .http_only(true)
        .secure(state.config.cookie_secure)
        .same_site(SameSite::Lax)
        .max_age(TimeDuration::ZERO);

    (jar.add(remove_session), Json(SessionResponse::anonymous()))
}

/// Protected example page
pub async fn secret(RequireSession(claims): RequireSession) -> Json<MessageResponse> {
    let who = match claims.label() {
        "" => "unknown user",
        label => label,
    };
    Json(MessageResponse {
        message: format!("You are authenticated as {who}."),
    })
}

/// Admin-only check
pub async fn admin(RequireAdmin(claims): RequireAdmin) -> Json<AdminResponse> {
    Json(AdminResponse {
        admin: true,
        email: claims.email,
    })
}
