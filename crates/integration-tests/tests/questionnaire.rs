//! End-to-end intake questionnaire tests.

use axum::http::StatusCode;

use prana_integration_tests::{
    FORMS_PATH, StubBehavior, UNREACHABLE, spawn, spawn_site, spawn_stub, site_config,
};

const VALID: &str = "name=Asha+Rao&email=asha%40example.com&phone=9876543210&age=34\
&gender=Female&goals=Better+Sleep&goals=Stress+Reduction\
&healthConditions=&dietaryRestrictions=Vegetarian&experience=Beginner&availability=Weekends";

#[tokio::test]
async fn test_valid_submission_reaches_forms_endpoint() {
    let (site, stub) = spawn(StubBehavior::default()).await;

    let response = site.post_form("/questionnaire", VALID).await;
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.url().path(), "/questionnaire/thanks");
    assert_eq!(stub.log.count(FORMS_PATH), 1);
}

#[tokio::test]
async fn test_invalid_submission_makes_no_call() {
    let (site, stub) = spawn(StubBehavior::default()).await;

    let response = site
        .post_form(
            "/questionnaire",
            "name=+&email=not-an-email&phone=5123456789&age=0&goals=Better+Sleep",
        )
        .await;
    assert_eq!(response.status().as_u16(), 422);

    let html = response.text().await.unwrap_or_default();
    assert!(html.contains("Name required"));
    assert!(html.contains("Valid email required"));
    assert!(html.contains("Valid 10-digit Indian phone required"));
    assert!(html.contains("Valid age required"));
    // The visitor's answers are kept.
    assert!(html.contains("value=\"not-an-email\""));
    assert!(html.contains("value=\"Better Sleep\" checked"));

    assert!(stub.log.entries().is_empty());
}

#[tokio::test]
async fn test_only_phone_invalid_reports_only_phone() {
    let (site, _stub) = spawn(StubBehavior::default()).await;

    let body = VALID.replace("phone=9876543210", "phone=987654321");
    let response = site.post_form("/questionnaire", &body).await;
    assert_eq!(response.status().as_u16(), 422);

    let html = response.text().await.unwrap_or_default();
    assert!(html.contains("Valid 10-digit Indian phone required"));
    assert!(!html.contains("Name required"));
    assert!(!html.contains("Valid email required"));
    assert!(!html.contains("Valid age required"));
}

#[tokio::test]
async fn test_forms_failure_shows_banner() {
    let (site, stub) = spawn(StubBehavior {
        forms_status: StatusCode::INTERNAL_SERVER_ERROR,
        ..StubBehavior::default()
    })
    .await;

    let response = site.post_form("/questionnaire", VALID).await;
    assert_eq!(response.status().as_u16(), 502);

    let html = response.text().await.unwrap_or_default();
    assert!(html.contains("Submission failed. Please try again."));
    assert!(html.contains("value=\"Asha Rao\""));
    assert_eq!(stub.log.count(FORMS_PATH), 1);
}

#[tokio::test]
async fn test_unreachable_forms_endpoint_shows_banner() {
    let stub = spawn_stub(StubBehavior::default()).await;
    let mut config = site_config(&stub.url);
    config.forms.endpoint = format!("{UNREACHABLE}{FORMS_PATH}");
    let site = spawn_site(config).await;

    let response = site.post_form("/questionnaire", VALID).await;
    assert_eq!(response.status().as_u16(), 502);

    let html = response.text().await.unwrap_or_default();
    assert!(html.contains("Submission failed. Please try again."));
    assert!(html.contains("value=\"asha@example.com\""));
    assert_eq!(stub.log.count(FORMS_PATH), 0);
}

#[tokio::test]
async fn test_long_email_is_accepted() {
    let (site, stub) = spawn(StubBehavior::default()).await;

    let long_local = "a".repeat(260);
    let body = VALID.replace("email=asha", &format!("email={long_local}"));
    let response = site.post_form("/questionnaire", &body).await;
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(stub.log.count(FORMS_PATH), 1);
}
