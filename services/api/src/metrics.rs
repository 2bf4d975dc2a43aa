//! Prometheus metrics for the API service

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Instant;

pub const SESSIONS_ISSUED: &str = "auth_sessions_issued_total";
pub const LOGIN_FAILURES: &str = "auth_login_failures_total";
pub const SIGNUPS_RECORDED: &str = "billing_signups_recorded_total";
pub const PLANS_IMPORTED: &str = "billing_plans_imported_total";
pub const BILLING_OPERATION_DURATION: &str = "billing_operation_duration_seconds";

/// Install the Prometheus recorder and describe all metrics
pub fn setup_metrics() -> anyhow::Result<PrometheusHandle> {
    // Most operations are one PayPal round trip plus one upsert
    let billing_latency_buckets = &[0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 15.0];

    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full(BILLING_OPERATION_DURATION.to_string()),
            billing_latency_buckets,
        )?
        .install_recorder()?;

    describe_metrics();
    Ok(handle)
}

pub fn describe_metrics() {
    describe_counter!(SESSIONS_ISSUED, "Total session tokens issued");
    describe_counter!(LOGIN_FAILURES, "Total failed sign-ins by reason");
    describe_counter!(SIGNUPS_RECORDED, "Total subscription signups recorded");
    describe_counter!(PLANS_IMPORTED, "Total subscription plans imported");
    describe_histogram!(
        BILLING_OPERATION_DURATION,
        "Billing operation latency in seconds by operation type"
    );
}

pub fn record_session_issued() {
    counter!(SESSIONS_ISSUED).increment(1);
}

pub fn record_login_failure(reason: &'static str) {
    counter!(LOGIN_FAILURES, "reason" => reason).increment(1);
}

pub fn record_signup() {
    counter!(SIGNUPS_RECORDED).increment(1);
}

pub fn record_plan_import() {
    counter!(PLANS_IMPORTED).increment(1);
}

/// Record how long a billing operation took
pub fn record_billing_operation(operation: &'static str, started: Instant, success: bool) {
    histogram!(
        BILLING_OPERATION_DURATION,
        "operation" => operation,
        "status" => if success { "ok" } else { "error" }
    )
    .record(started.elapsed().as_secs_f64());
}
