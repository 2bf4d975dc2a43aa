//! Liveness and readiness probes

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Readiness report. Only the database decides the status code; the
/// integration flags are informational.
#[derive(Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub database: &'static str,
    pub google_auth: bool,
    pub session_signing: bool,
    pub paypal: bool,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub async fn ready(State(state): State<AppState>) -> (StatusCode, Json<ReadyResponse>) {
    let database_up = match state.billing.ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::error!(error = ?e, "Readiness: database unreachable");
            false
        }
    };

    let report = ReadyResponse {
        status: if database_up { "ready" } else { "unavailable" },
        database: if database_up { "connected" } else { "unreachable" },
        google_auth: state.config.auth.google_auth_configured(),
        session_signing: state.gate.codec().has_secret(),
        paypal: state.config.billing.is_configured(),
    };

    let status = if database_up {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(report))
}
