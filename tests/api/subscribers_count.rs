use serde_json::json;
use wiremock::matchers::any;
use wiremock::{Mock, ResponseTemplate};

use crate::helpers::TestApp;

#[tokio::test]
async fn count_is_zero_for_a_fresh_store() {
    let test_app = TestApp::spawn_app().await;

    let response = test_app.get_subscribers_count(None).await;

    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "count": 0 }));
}

#[tokio::test]
async fn count_is_stable_without_new_subscriptions() {
    let test_app = TestApp::spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .mount(&test_app.email_server)
        .await;
    test_app
        .post_subscription(json!({ "email": "frank@test.com" }))
        .await;

    let first = test_app.count().await;
    let second = test_app.count().await;

    assert_eq!(first, 1);
    assert_eq!(first, second);
}

#[tokio::test]
async fn count_requires_the_admin_token_when_configured() {
    let test_app = TestApp::spawn_app_with_admin_token(Some("s3cr3t")).await;

    let anonymous = test_app.get_subscribers_count(None).await;
    let wrong = test_app.get_subscribers_count(Some("nope")).await;
    let admin = test_app.get_subscribers_count(Some("s3cr3t")).await;

    assert_eq!(anonymous.status().as_u16(), 401);
    assert_eq!(wrong.status().as_u16(), 401);
    assert_eq!(admin.status().as_u16(), 200);
}
