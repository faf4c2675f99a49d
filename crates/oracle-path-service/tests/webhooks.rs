//! Stripe webhook integration tests.

mod common;

use common::TestHarness;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mount a customer lookup mock mapping `cus_test` back to the given user.
async fn mount_customer(server: &MockServer, user_id: &str) {
    Mock::given(method("GET"))
        .and(path("/customers/cus_test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "cus_test",
            "email": "seeker@example.com",
            "name": "Seeker",
            "metadata": {"user_id": user_id}
        })))
        .mount(server)
        .await;
}

fn subscription_event(event_type: &str, status: &str, cancel_at_period_end: bool) -> String {
    json!({
        "id": "evt_test_001",
        "type": event_type,
        "data": {
            "object": {
                "id": "sub_test",
                "status": status,
                "cancel_at_period_end": cancel_at_period_end,
                "customer": "cus_test",
                "items": {"data": [{"price": {"id": "price_premium"}}]}
            }
        }
    })
    .to_string()
}

async fn post_signed_webhook(harness: &TestHarness, payload: &str) -> axum_test::TestResponse {
    harness
        .server
        .post("/webhooks/stripe")
        .add_header("stripe-signature", TestHarness::sign_webhook(payload))
        .add_header("content-type", "application/json")
        .text(payload.to_string())
        .await
}

async fn subscription_view(harness: &TestHarness) -> serde_json::Value {
    let response = harness
        .server
        .get("/v1/subscription")
        .add_header("authorization", harness.user_auth_header())
        .await;
    response.assert_status_ok();
    response.json()
}

#[tokio::test]
async fn activation_grants_premium_access() {
    let stripe = MockServer::start().await;
    let harness = TestHarness::with_stripe(&stripe.uri());
    mount_customer(&stripe, &harness.test_user_id.to_string()).await;

    let payload = subscription_event("customer.subscription.updated", "active", false);
    let response = post_signed_webhook(&harness, &payload).await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["received"], true);

    let view = subscription_view(&harness).await;
    assert_eq!(view["has_premium_access"], true);
    assert_eq!(view["subscription_status"], "active");
    assert_eq!(view["subscription_id"], "sub_test");
}

#[tokio::test]
async fn cancel_at_period_end_keeps_access() {
    let stripe = MockServer::start().await;
    let harness = TestHarness::with_stripe(&stripe.uri());
    mount_customer(&stripe, &harness.test_user_id.to_string()).await;

    let activate = subscription_event("customer.subscription.updated", "active", false);
    post_signed_webhook(&harness, &activate).await.assert_status_ok();

    // The subscription still reports "active" while scheduled to cancel.
    let cancelling = subscription_event("customer.subscription.updated", "active", true);
    post_signed_webhook(&harness, &cancelling).await.assert_status_ok();

    let view = subscription_view(&harness).await;
    assert_eq!(view["subscription_status"], "cancelling");
    assert_eq!(view["has_premium_access"], true);
}

#[tokio::test]
async fn deletion_revokes_premium_access() {
    let stripe = MockServer::start().await;
    let harness = TestHarness::with_stripe(&stripe.uri());
    mount_customer(&stripe, &harness.test_user_id.to_string()).await;

    let activate = subscription_event("customer.subscription.created", "active", false);
    post_signed_webhook(&harness, &activate).await.assert_status_ok();

    let deleted = subscription_event("customer.subscription.deleted", "canceled", false);
    post_signed_webhook(&harness, &deleted).await.assert_status_ok();

    let view = subscription_view(&harness).await;
    assert_eq!(view["has_premium_access"], false);
    assert_eq!(view["subscription_status"], "inactive");
}

#[tokio::test]
async fn invalid_signature_changes_nothing() {
    let stripe = MockServer::start().await;
    let harness = TestHarness::with_stripe(&stripe.uri());
    mount_customer(&stripe, &harness.test_user_id.to_string()).await;

    let payload = subscription_event("customer.subscription.updated", "active", false);
    let response = harness
        .server
        .post("/webhooks/stripe")
        .add_header("stripe-signature", "t=1700000000,v1=deadbeef")
        .add_header("content-type", "application/json")
        .text(payload)
        .await;

    response.assert_status_bad_request();

    let view = subscription_view(&harness).await;
    assert_eq!(view["has_premium_access"], false);
}

#[tokio::test]
async fn missing_signature_header_is_rejected() {
    let stripe = MockServer::start().await;
    let harness = TestHarness::with_stripe(&stripe.uri());

    let payload = subscription_event("customer.subscription.updated", "active", false);
    let response = harness
        .server
        .post("/webhooks/stripe")
        .add_header("content-type", "application/json")
        .text(payload)
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn unknown_event_types_are_acknowledged() {
    let stripe = MockServer::start().await;
    let harness = TestHarness::with_stripe(&stripe.uri());

    let payload = json!({
        "id": "evt_test_002",
        "type": "invoice.payment_succeeded",
        "data": {"object": {"id": "in_test"}}
    })
    .to_string();

    let response = post_signed_webhook(&harness, &payload).await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["received"], true);
}

#[tokio::test]
async fn webhook_clears_pending_cancellation() {
    let stripe = MockServer::start().await;
    let harness = TestHarness::with_stripe(&stripe.uri());
    mount_customer(&stripe, &harness.test_user_id.to_string()).await;

    // Activate, then cancel through the API so a pending status is recorded.
    let activate = subscription_event("customer.subscription.updated", "active", false);
    post_signed_webhook(&harness, &activate).await.assert_status_ok();

    Mock::given(method("POST"))
        .and(path("/subscriptions/sub_test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "sub_test",
            "status": "active",
            "cancel_at_period_end": true,
            "cancel_at": 1_735_689_600,
            "customer": "cus_test"
        })))
        .mount(&stripe)
        .await;

    harness
        .server
        .post("/v1/subscription/cancel")
        .add_header("authorization", harness.user_auth_header())
        .await
        .assert_status_ok();

    let view = subscription_view(&harness).await;
    assert_eq!(view["pending_status"], "cancelling");

    // Webhook confirmation overwrites the optimistic pending status.
    let confirmed = subscription_event("customer.subscription.updated", "active", true);
    post_signed_webhook(&harness, &confirmed).await.assert_status_ok();

    let view = subscription_view(&harness).await;
    assert!(view.get("pending_status").is_none() || view["pending_status"].is_null());
    assert_eq!(view["subscription_status"], "cancelling");
}
