//! Subscription signup and plan catalog handlers

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use lt_billing_core::Subscriber;
use lt_db::{PlanRow, SignupRow};

use crate::error::{ApiError, ApiResult};
use crate::extractors::{RequireAdmin, RequireSession};
use crate::metrics;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSignupRequest {
    pub subscription_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportPlanRequest {
    pub plan_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SignupView {
    pub paypal_subscription_id: String,
    pub paypal_plan_id: Option<String>,
    pub paypal_status: Option<String>,
    pub paypal_status_updated_at: Option<String>,
    pub paypal_start_time: Option<String>,
    pub user_email: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<SignupRow> for SignupView {
    fn from(row: SignupRow) -> Self {
        Self {
            paypal_subscription_id: row.paypal_subscription_id,
            paypal_plan_id: row.paypal_plan_id,
            paypal_status: row.paypal_status,
            paypal_status_updated_at: row.paypal_status_updated_at,
            paypal_start_time: row.paypal_start_time,
            user_email: row.user_email,
            created_at: rfc3339(row.created_at),
            updated_at: rfc3339(row.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PlanView {
    pub paypal_plan_id: String,
    pub paypal_product_id: Option<String>,
    pub plan_name: Option<String>,
    pub plan_description: Option<String>,
    pub plan_status: Option<String>,
    pub billing_interval_unit: Option<String>,
    pub billing_interval_count: Option<i32>,
    pub currency_code: Option<String>,
    pub price_value: Option<String>,
    pub created_by_email: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<PlanRow> for PlanView {
    fn from(row: PlanRow) -> Self {
        Self {
            paypal_plan_id: row.paypal_plan_id,
            paypal_product_id: row.paypal_product_id,
            plan_name: row.plan_name,
            plan_description: row.plan_description,
            plan_status: row.plan_status,
            billing_interval_unit: row.billing_interval_unit,
            billing_interval_count: row.billing_interval_count,
            currency_code: row.currency_code,
            price_value: row.price_value,
            created_by_email: row.created_by_email,
            created_at: rfc3339(row.created_at),
            updated_at: rfc3339(row.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub signup: SignupView,
}

#[derive(Debug, Serialize)]
pub struct PlanResponse {
    pub plan: PlanView,
}

#[derive(Debug, Serialize)]
pub struct PlanListResponse {
    pub plans: Vec<PlanView>,
}

fn rfc3339(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

// ============================================================================
// Handlers
// ============================================================================

/// Record the caller's PayPal subscription
pub async fn record_signup(
    State(state): State<AppState>,
    RequireSession(claims): RequireSession,
    body: Result<Json<RecordSignupRequest>, JsonRejection>,
) -> ApiResult<Json<SignupResponse>> {
    let subscription_id = body
        .ok()
        .and_then(|Json(req)| req.subscription_id)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Missing subscriptionId".to_string()))?;

    let subscriber = Subscriber {
        subject: claims.subject,
        email: claims.email,
        name: claims.display_name,
    };

    let started = Instant::now();
    let result = state.billing.record_signup(&subscription_id, &subscriber).await;
    metrics::record_billing_operation("record_signup", started, result.is_ok());

    let row = result?;
    metrics::record_signup();

    Ok(Json(SignupResponse { signup: row.into() }))
}

/// Recorded plans, newest first
pub async fn list_plans(State(state): State<AppState>) -> ApiResult<Json<PlanListResponse>> {
    let plans = state.billing.list_plans().await?;
    Ok(Json(PlanListResponse {
        plans: plans.into_iter().map(PlanView::from).collect(),
    }))
}

/// Import an existing PayPal plan into the catalog
pub async fn import_plan(
    State(state): State<AppState>,
    RequireAdmin(claims): RequireAdmin,
    body: Result<Json<ImportPlanRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<PlanResponse>)> {
    let plan_id = body
        .ok()
        .and_then(|Json(req)| req.plan_id)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Missing planId".to_string()))?;

    let started = Instant::now();
    let result = state
        .billing
        .import_plan(&plan_id, claims.email.as_deref())
        .await;
    metrics::record_billing_operation("import_plan", started, result.is_ok());

    let row = result?;
    metrics::record_plan_import();

    Ok((StatusCode::CREATED, Json(PlanResponse { plan: row.into() })))
}
