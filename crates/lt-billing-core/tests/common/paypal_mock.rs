//! wiremock stand-in for the PayPal REST API

use lt_billing_core::BillingConfig;
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockGuard, MockServer, ResponseTemplate};

pub const TEST_ACCESS_TOKEN: &str = "A21AA-test-access-token";
pub const TEST_CLIENT_ID: &str = "paypal-test-client";
pub const TEST_CLIENT_SECRET: &str = "paypal-test-secret";

pub const SUBSCRIPTION_ID: &str = "I-BW452GLLEP1G";
pub const PLAN_ID: &str = "P-5ML4271244454362WXNWU5NQ";
pub const PRODUCT_ID: &str = "PROD-XXCD1234QWER65782";

const TOKEN_PATH: &str = "/v1/oauth2/token";

pub fn subscription_json() -> Value {
    json!({
        "id": SUBSCRIPTION_ID,
        "plan_id": PLAN_ID,
        "status": "ACTIVE",
        "status_update_time": "2024-05-01T10:00:00Z",
        "start_time": "2024-05-01T09:58:00Z",
        "subscriber": {"email_address": "buyer@example.com"}
    })
}

pub fn plan_json() -> Value {
    json!({
        "id": PLAN_ID,
        "product_id": PRODUCT_ID,
        "name": "Pro Monthly",
        "description": "Everything, monthly",
        "status": "ACTIVE",
        "billing_cycles": [
            {
                "tenure_type": "TRIAL",
                "sequence": 1,
                "frequency": {"interval_unit": "WEEK", "interval_count": 1},
                "pricing_scheme": {"fixed_price": {"value": "0", "currency_code": "USD"}}
            },
            {
                "tenure_type": "REGULAR",
                "sequence": 2,
                "frequency": {"interval_unit": "MONTH", "interval_count": 1},
                "pricing_scheme": {"fixed_price": {"value": "12.50", "currency_code": "USD"}}
            }
        ]
    })
}

pub fn product_json() -> Value {
    json!({
        "id": PRODUCT_ID,
        "name": "Pro",
        "description": "The pro product",
        "type": "SERVICE"
    })
}

pub struct PayPalMockServer {
    server: MockServer,
}

impl PayPalMockServer {
    /// Server with a token endpoint and the standard catalog mounted
    pub async fn start() -> Self {
        let mock = Self::start_bare().await;
        mock.mount_token(3600).await;
        mock.mount_resource(
            &format!("/v1/billing/subscriptions/{SUBSCRIPTION_ID}"),
            subscription_json(),
        )
        .await;
        mock.mount_resource(&format!("/v1/billing/plans/{PLAN_ID}"), plan_json())
            .await;
        mock.mount_resource(&format!("/v1/catalogs/products/{PRODUCT_ID}"), product_json())
            .await;
        mock
    }

    pub async fn start_bare() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Billing config with test credentials pointed at this server
    pub fn config(&self) -> BillingConfig {
        BillingConfig::new(
            Some(TEST_CLIENT_ID.to_string()),
            Some(TEST_CLIENT_SECRET.to_string()),
        )
        .with_api_base_override(self.uri())
    }

    pub async fn mount_token(&self, expires_in: u64) {
        Mock::given(method("POST"))
            .and(path(TOKEN_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(token_body(expires_in)))
            .mount(&self.server)
            .await;
    }

    /// Token endpoint that must be hit exactly `expected_calls` times
    #[allow(dead_code)]
    pub async fn expect_token_calls(&self, expires_in: u64, expected_calls: u64) -> MockGuard {
        Mock::given(method("POST"))
            .and(path(TOKEN_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(token_body(expires_in)))
            .expect(expected_calls)
            .mount_as_scoped(&self.server)
            .await
    }

    /// Serve `body` at `resource_path` for requests carrying the test token
    pub async fn mount_resource(&self, resource_path: &str, body: Value) {
        Mock::given(method("GET"))
            .and(path(resource_path))
            .and(header("authorization", format!("Bearer {TEST_ACCESS_TOKEN}").as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    #[allow(dead_code)]
    pub async fn mount_status(&self, http_method: &str, resource_path: &str, status: u16) {
        Mock::given(method(http_method))
            .and(path(resource_path))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }

    /// Requests the server has seen so far
    #[allow(dead_code)]
    pub async fn request_count(&self) -> usize {
        self.server
            .received_requests()
            .await
            .map(|r| r.len())
            .unwrap_or(0)
    }
}

fn token_body(expires_in: u64) -> Value {
    json!({
        "scope": "https://uri.paypal.com/services/subscriptions",
        "access_token": TEST_ACCESS_TOKEN,
        "token_type": "Bearer",
        "app_id": "APP-80W284485P519543T",
        "expires_in": expires_in,
        "nonce": "2024-05-01T10:00:00ZnonCe"
    })
}
