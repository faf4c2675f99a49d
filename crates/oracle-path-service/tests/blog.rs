//! Blog CMS integration tests.

mod common;

use common::TestHarness;
use serde_json::json;

const FAQ_CONTENT: &str = concat!(
    "<article><p>How the Oracle works.</p>",
    "<script type=\"application/json\" id=\"faq-data\">",
    r#"{"faqs": [{"title": "Basics", "items": [{"question": "Is it free?", "answer": "Five visions a day."}]}]}"#,
    "</script></article>",
);

async fn create_post(
    harness: &TestHarness,
    title: &str,
    slug: &str,
    content: &str,
    published: bool,
) -> axum_test::TestResponse {
    harness
        .server
        .post("/v1/blog")
        .add_header("authorization", harness.user_auth_header())
        .json(&json!({
            "title": title,
            "slug": slug,
            "content": content,
            "excerpt": "A short summary.",
            "author": "The Keeper",
            "published": published
        }))
        .await
}

#[tokio::test]
async fn create_and_fetch_published_post() {
    let harness = TestHarness::new();
    harness.grant_admin().await;

    let response = create_post(&harness, "How it works", "how-it-works", FAQ_CONTENT, true).await;
    response.assert_status_ok();

    let fetched = harness.server.get("/v1/blog/how-it-works").await;
    fetched.assert_status_ok();
    let body: serde_json::Value = fetched.json();
    assert_eq!(body["title"], "How it works");

    // The marker block is stripped and its payload surfaced as data.
    assert!(!body["content"].as_str().unwrap().contains("faq-data"));
    assert_eq!(body["faqs"][0]["title"], "Basics");
    assert_eq!(body["faqs"][0]["items"][0]["question"], "Is it free?");
}

#[tokio::test]
async fn malformed_faq_payload_keeps_content_intact() {
    let harness = TestHarness::new();
    harness.grant_admin().await;

    let content = "<article><script type=\"application/json\" id=\"faq-data\">{broken</script></article>";
    create_post(&harness, "Broken FAQ", "broken-faq", content, true)
        .await
        .assert_status_ok();

    let fetched = harness.server.get("/v1/blog/broken-faq").await;
    fetched.assert_status_ok();
    let body: serde_json::Value = fetched.json();
    assert_eq!(body["content"], content);
    assert!(body.get("faqs").is_none() || body["faqs"].is_null());
}

#[tokio::test]
async fn non_admin_cannot_create_posts() {
    let harness = TestHarness::new();

    let response = create_post(&harness, "Sneaky", "sneaky", "<p>hi</p>", true).await;

    response.assert_status_forbidden();
}

#[tokio::test]
async fn anonymous_listing_shows_published_only() {
    let harness = TestHarness::new();
    harness.grant_admin().await;

    create_post(&harness, "Public", "public", "<p>visible</p>", true)
        .await
        .assert_status_ok();
    create_post(&harness, "Draft", "draft", "<p>hidden</p>", false)
        .await
        .assert_status_ok();

    let response = harness.server.get("/v1/blog").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["count"], 1);
    assert_eq!(body["posts"][0]["slug"], "public");

    // Drafts are invisible by slug too.
    harness.server.get("/v1/blog/draft").await.assert_status_not_found();
}

#[tokio::test]
async fn duplicate_published_slug_is_rejected() {
    let harness = TestHarness::new();
    harness.grant_admin().await;

    create_post(&harness, "First", "shared-slug", "<p>one</p>", true)
        .await
        .assert_status_ok();

    let response = create_post(&harness, "Second", "shared-slug", "<p>two</p>", true).await;

    assert_eq!(response.status_code(), 409);
}

#[tokio::test]
async fn unpublishing_frees_the_slug() {
    let harness = TestHarness::new();
    harness.grant_admin().await;

    let created = create_post(&harness, "First", "moving-slug", "<p>one</p>", true).await;
    created.assert_status_ok();
    let created: serde_json::Value = created.json();
    let post_id = created["id"].as_str().unwrap().to_string();

    harness
        .server
        .put(&format!("/v1/blog/{post_id}"))
        .add_header("authorization", harness.user_auth_header())
        .json(&json!({ "published": false }))
        .await
        .assert_status_ok();

    harness
        .server
        .get("/v1/blog/moving-slug")
        .await
        .assert_status_not_found();

    // Another post can now claim the slug.
    create_post(&harness, "Second", "moving-slug", "<p>two</p>", true)
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn update_rewrites_faqs_when_content_changes() {
    let harness = TestHarness::new();
    harness.grant_admin().await;

    let created = create_post(&harness, "Evolving", "evolving", FAQ_CONTENT, true).await;
    created.assert_status_ok();
    let created: serde_json::Value = created.json();
    let post_id = created["id"].as_str().unwrap().to_string();

    let response = harness
        .server
        .put(&format!("/v1/blog/{post_id}"))
        .add_header("authorization", harness.user_auth_header())
        .json(&json!({ "content": "<p>No FAQs anymore.</p>" }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["content"], "<p>No FAQs anymore.</p>");
    assert!(body.get("faqs").is_none() || body["faqs"].is_null());
}

#[tokio::test]
async fn update_of_missing_post_is_not_found() {
    let harness = TestHarness::new();
    harness.grant_admin().await;

    let missing_id = oracle_path_core::PostId::generate();
    let response = harness
        .server
        .put(&format!("/v1/blog/{missing_id}"))
        .add_header("authorization", harness.user_auth_header())
        .json(&json!({ "title": "Ghost" }))
        .await;

    response.assert_status_not_found();
}
