//! Usage quota integration tests.

mod common;

use common::TestHarness;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn fresh_user_has_full_allowance() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .get("/v1/usage/remaining")
        .add_header("authorization", harness.user_auth_header())
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["remaining"], 5);
    assert_eq!(body["limit"], 5);
    assert_eq!(body["is_premium"], false);
}

#[tokio::test]
async fn premium_user_reports_unmetered_allowance() {
    let stripe = MockServer::start().await;
    let harness = TestHarness::with_stripe(&stripe.uri());

    Mock::given(method("GET"))
        .and(path("/customers/cus_test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "cus_test",
            "email": null,
            "name": null,
            "metadata": {"user_id": harness.test_user_id.to_string()}
        })))
        .mount(&stripe)
        .await;

    let payload = json!({
        "id": "evt_usage_001",
        "type": "customer.subscription.updated",
        "data": {
            "object": {
                "id": "sub_test",
                "status": "active",
                "cancel_at_period_end": false,
                "customer": "cus_test"
            }
        }
    })
    .to_string();

    harness
        .server
        .post("/webhooks/stripe")
        .add_header("stripe-signature", TestHarness::sign_webhook(&payload))
        .text(payload)
        .await
        .assert_status_ok();

    let response = harness
        .server
        .get("/v1/usage/remaining")
        .add_header("authorization", harness.user_auth_header())
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["is_premium"], true);
    assert_eq!(body["remaining"], 5);
}

#[tokio::test]
async fn remaining_requires_authentication() {
    let harness = TestHarness::new();

    let response = harness.server.get("/v1/usage/remaining").await;

    response.assert_status_unauthorized();
}
