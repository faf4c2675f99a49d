//! Subscription management integration tests.

mod common;

use common::TestHarness;
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn fresh_user_has_no_subscription() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .get("/v1/subscription")
        .add_header("authorization", harness.user_auth_header())
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["has_premium_access"], false);
    assert_eq!(body["subscription_status"], "inactive");
}

#[tokio::test]
async fn create_subscription_returns_client_secret() {
    let stripe = MockServer::start().await;

    // Customer creation must carry our user ID as metadata.
    Mock::given(method("POST"))
        .and(path("/customers"))
        .and(body_string_contains("metadata%5Buser_id%5D"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "cus_new",
            "email": "seeker@example.com",
            "name": null,
            "metadata": {}
        })))
        .mount(&stripe)
        .await;

    Mock::given(method("POST"))
        .and(path("/subscriptions"))
        .and(body_string_contains("payment_behavior=default_incomplete"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "sub_new",
            "status": "incomplete",
            "customer": "cus_new",
            "items": {"data": [{"price": {"id": "price_premium"}}]},
            "latest_invoice": {
                "payment_intent": {"id": "pi_new", "client_secret": "pi_new_secret"}
            }
        })))
        .mount(&stripe)
        .await;

    let harness = TestHarness::with_stripe(&stripe.uri());

    let response = harness
        .server
        .post("/v1/subscription")
        .add_header("authorization", harness.user_auth_header())
        .json(&json!({ "email": "seeker@example.com" }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["subscription_id"], "sub_new");
    assert_eq!(body["client_secret"], "pi_new_secret");

    // Provider IDs are recorded, but entitlement stays off until the
    // webhook confirms payment.
    let view = harness
        .server
        .get("/v1/subscription")
        .add_header("authorization", harness.user_auth_header())
        .await;
    let view: serde_json::Value = view.json();
    assert_eq!(view["subscription_id"], "sub_new");
    assert_eq!(view["has_premium_access"], false);
}

#[tokio::test]
async fn cancel_without_subscription_is_not_found() {
    let stripe = MockServer::start().await;
    let harness = TestHarness::with_stripe(&stripe.uri());

    let response = harness
        .server
        .post("/v1/subscription/cancel")
        .add_header("authorization", harness.user_auth_header())
        .await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn create_subscription_without_stripe_fails() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/v1/subscription")
        .add_header("authorization", harness.user_auth_header())
        .json(&json!({}))
        .await;

    assert_eq!(response.status_code(), 502);
}
