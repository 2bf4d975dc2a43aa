//! Axum extractors for session authentication

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;

use lt_auth_core::{SessionClaims, TokenCarrier};

use crate::error::ApiError;
use crate::state::AppState;

/// Request cookies viewed as a token carrier
pub struct SessionCookies<'a>(pub &'a CookieJar);

impl TokenCarrier for SessionCookies<'_> {
    fn read(&self, name: &str) -> Option<String> {
        self.0.get(name).map(|cookie| cookie.value().to_string())
    }
}

/// Session of the caller, or 401
#[derive(Debug, Clone)]
pub struct RequireSession(pub SessionClaims);

impl<S> FromRequestParts<S> for RequireSession
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let jar = CookieJar::from_headers(&parts.headers);

        let claims = app_state.gate.require_session(&SessionCookies(&jar))?;
        Ok(RequireSession(claims))
    }
}

/// Session of the caller if there is a valid one
#[derive(Debug, Clone)]
pub struct MaybeSession(pub Option<SessionClaims>);

impl<S> FromRequestParts<S> for MaybeSession
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let jar = CookieJar::from_headers(&parts.headers);

        Ok(MaybeSession(
            app_state.gate.current_session(&SessionCookies(&jar)),
        ))
    }
}

/// Admin session; 401 without a session, 403 for everyone else
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub SessionClaims);

impl<S> FromRequestParts<S> for RequireAdmin
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let jar = CookieJar::from_headers(&parts.headers);

        let claims = app_state.gate.require_admin(&SessionCookies(&jar))?;
        Ok(RequireAdmin(claims))
    }
}
