//! Site-wide behaviour: health, headers, catalog and cart.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;

use prana_integration_tests::{StubBehavior, spawn};

#[tokio::test]
async fn test_health_and_readiness() {
    let (site, _stub) = spawn(StubBehavior::default()).await;

    let (status, body) = site.get_text("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");

    let (status, _) = site.get_text("/health/ready").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_pages_carry_nonce_matching_csp() {
    let (site, _stub) = spawn(StubBehavior::default()).await;

    let response = site.client.get(site.at("/blog")).send().await.unwrap();
    let csp = response
        .headers()
        .get("content-security-policy")
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(response.headers().contains_key("x-request-id"));

    let html = response.text().await.unwrap();
    let nonce = html
        .split("nonce=\"")
        .nth(1)
        .and_then(|rest| rest.split('"').next())
        .unwrap();
    assert!(csp.contains(&format!("'nonce-{nonce}'")), "{csp}");
}

#[tokio::test]
async fn test_home_lists_catalog() {
    let (site, _stub) = spawn(StubBehavior::default()).await;

    let (status, html) = site.get_text("/").await;
    assert_eq!(status, StatusCode::OK);
    for name in [
        "Nutrition Consultation",
        "Yoga Class",
        "Guided Meditation",
        "Life Coaching",
    ] {
        assert!(html.contains(name), "{name} missing");
    }
}

#[tokio::test]
async fn test_unknown_service_is_not_found() {
    let (site, _stub) = spawn(StubBehavior::default()).await;

    let (status, _) = site.get_text("/services/reiki").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, html) = site.get_text("/services/yoga-class").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("action=\"/cart/add\""));
}

#[tokio::test]
async fn test_cart_totals_include_gst() {
    let (site, _stub) = spawn(StubBehavior::default()).await;

    site.post_form("/cart/add", "slug=nutrition-consultation&quantity=1")
        .await;
    let response = site.post_form("/cart/add", "slug=yoga-class").await;
    assert_eq!(response.url().path(), "/cart");

    // 1500 + 800 = 2300; GST 414; total 2714.
    let html = response.text().await.unwrap();
    assert!(html.contains("₹2,300"), "{html}");
    assert!(html.contains("₹414"));
    assert!(html.contains("₹2,714"));

    let (_, checkout) = site.get_text("/checkout").await;
    assert!(checkout.contains("Pay ₹2,714"));
    assert!(!checkout.contains("disabled"));
}

#[tokio::test]
async fn test_cart_update_to_zero_removes_line() {
    let (site, _stub) = spawn(StubBehavior::default()).await;

    site.post_form("/cart/add", "slug=yoga-class&quantity=3").await;
    let response = site
        .post_form("/cart/update", "id=yoga-class&quantity=0")
        .await;

    let html = response.text().await.unwrap();
    assert!(html.contains("Your cart is empty."));

    let (_, checkout) = site.get_text("/checkout").await;
    assert!(checkout.contains("disabled"));
}

#[tokio::test]
async fn test_unknown_service_cannot_be_added() {
    let (site, _stub) = spawn(StubBehavior::default()).await;

    let response = site.post_form("/cart/add", "slug=reiki").await;
    assert_eq!(response.status().as_u16(), 400);
}
