//! Shared fixtures for router tests


#[allow(unused_imports)]
pub use fakes::{FakeIdentityVerifier, FakePaymentProvider, InMemoryRepository};

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use lt_api::{build_router, AppState, Config, DynBilling};
use lt_auth_core::{SessionGate, VerifiedIdentity, SESSION_COOKIE_NAME};
use tower::ServiceExt;

pub const TEST_SECRET: &str = "router-test-secret-0123456789abcdef";
pub const TEST_CLIENT_ID: &str = "test-client.apps.googleusercontent.com";
pub const ADMIN_EMAIL: &str = "boss@example.com";

/// Everything a router test needs to poke at
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub repo: InMemoryRepository,
    pub provider: FakePaymentProvider,
}

impl TestApp {
    /// App with secret, client id and one admin configured
    pub fn new() -> Self {
        Self::with_env(&[
            ("AUTH_SESSION_SECRET", TEST_SECRET),
            ("GOOGLE_CLIENT_ID", TEST_CLIENT_ID),
            ("ADMIN_EMAILS", ADMIN_EMAIL),
        ])
    }

    /// App built from the given environment on top of a database URL
    pub fn with_env(pairs: &[(&str, &str)]) -> Self {
        let mut env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        env.insert("DATABASE_URL".to_string(), "postgres://unused".to_string());
        let config = Config::from_lookup(|k| env.get(k).cloned()).expect("test config");

        let repo = InMemoryRepository::new();
        let provider = FakePaymentProvider::new();
        let billing = DynBilling::new(Arc::new(repo.clone()), Arc::new(provider.clone()));
        let gate = SessionGate::from_config(&config.auth);

        let state = AppState::new(gate, Arc::new(FakeIdentityVerifier), billing, config);
        let router = build_router(state.clone(), None);

        Self {
            router,
            state,
            repo,
            provider,
        }
    }

    /// `Cookie` header value carrying a fresh session for `email`
    pub fn session_cookie(&self, subject: &str, email: Option<&str>) -> String {
        let identity = VerifiedIdentity {
            subject: subject.to_string(),
            email: email.map(String::from),
            display_name: Some("Test User".to_string()),
            picture_url: None,
        };
        let token = self
            .state
            .gate
            .codec()
            .issue(&identity)
            .expect("issue test token");
        format!("{SESSION_COOKIE_NAME}={token}")
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::get(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn post_json(
        &self,
        uri: &str,
        cookie: Option<&str>,
        body: serde_json::Value,
    ) -> Response<Body> {
        let mut builder = Request::post(uri).header(header::CONTENT_TYPE, "application/json");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }
}

/// Collect a response body as JSON
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("json body")
}

/// The `Set-Cookie` header for the session cookie, if any
pub fn session_set_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with(&format!("{SESSION_COOKIE_NAME}=")))
        .map(str::to_string)
}
