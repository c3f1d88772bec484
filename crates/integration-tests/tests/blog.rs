//! End-to-end blog tests.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use serde_json::Value;

use prana_integration_tests::{
    StubBehavior, UNREACHABLE, post_json, spawn, spawn_site, site_config,
};

fn posts(count: usize) -> Vec<Value> {
    (1..=count)
        .map(|n| post_json(&format!("post-{n}"), &format!("Article {n}"), "Daily habits"))
        .collect()
}

fn card_count(html: &str) -> usize {
    html.matches("<article class=\"card\">").count()
}

#[tokio::test]
async fn test_list_renders_backend_posts() {
    let (site, _stub) = spawn(StubBehavior {
        posts: vec![
            post_json("a1", "Morning Pranayama", "Breathing drills before breakfast"),
            post_json("a2", "Sleep Hygiene", "Wind down in ten minutes"),
        ],
        ..StubBehavior::default()
    })
    .await;

    let (status, html) = site.get_text("/blog").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Morning Pranayama"));
    assert!(html.contains("Sleep Hygiene"));
    assert!(html.contains("href=\"/blog/a1\""));
    assert!(html.contains("5 min read"));
    assert!(html.contains("January 15, 2025"));
}

#[tokio::test]
async fn test_malformed_post_does_not_hide_the_rest() {
    let mut undated = post_json("a2", "Sleep Hygiene", "Wind down in ten minutes");
    undated["createdAt"] = Value::Null;
    let mut untitled = post_json("a3", "", "");
    untitled.as_object_mut().unwrap().remove("title");

    let (site, _stub) = spawn(StubBehavior {
        posts: vec![
            post_json("a1", "Morning Pranayama", "Breathing drills before breakfast"),
            undated,
            untitled,
        ],
        ..StubBehavior::default()
    })
    .await;

    let (status, html) = site.get_text("/blog").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(card_count(&html), 2);
    assert!(html.contains("Morning Pranayama"));
    assert!(html.contains("Sleep Hygiene"));
    assert_eq!(html.matches("January 15, 2025").count(), 1);
}

#[tokio::test]
async fn test_category_label_is_capitalized() {
    let (site, _stub) = spawn(StubBehavior {
        posts: vec![post_json("a1", "Morning Pranayama", "Breathing drills")],
        ..StubBehavior::default()
    })
    .await;

    let (_, list) = site.get_text("/blog").await;
    assert!(list.contains("<p class=\"tag\">Wellness</p>"));

    let (_, detail) = site.get_text("/blog/a1").await;
    assert!(detail.contains("<p class=\"tag\">Wellness</p>"));
}

#[tokio::test]
async fn test_category_is_sent_lowercased() {
    let (site, stub) = spawn(StubBehavior::default()).await;

    let (status, html) = site.get_text("/blog?category=Life%20Coaching").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("name=\"category\" value=\"Life Coaching\""));
    assert_eq!(
        stub.log.entries(),
        vec!["/api/v1/get-blogs?category=life%20coaching".to_string()]
    );
}

#[tokio::test]
async fn test_unknown_category_means_all() {
    let (site, stub) = spawn(StubBehavior::default()).await;

    site.get_text("/blog?category=yoga").await;
    assert_eq!(stub.log.entries(), vec!["/api/v1/get-blogs".to_string()]);
}

#[tokio::test]
async fn test_backend_error_renders_empty_list() {
    let (site, _stub) = spawn(StubBehavior {
        blogs_status: StatusCode::INTERNAL_SERVER_ERROR,
        posts: posts(3),
        ..StubBehavior::default()
    })
    .await;

    let (status, html) = site.get_text("/blog").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(card_count(&html), 0);
    assert!(html.contains("No articles yet."));
}

#[tokio::test]
async fn test_unreachable_backend_renders_empty_list() {
    let site = spawn_site(site_config(UNREACHABLE)).await;

    let (status, html) = site.get_text("/blog").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("No articles yet."));

    // The home page still renders without its latest posts.
    let (status, html) = site.get_text("/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(!html.contains("From the blog"));
}

#[tokio::test]
async fn test_search_filters_title_and_small_description() {
    let (site, _stub) = spawn(StubBehavior {
        posts: vec![
            post_json("a1", "Better Sleep Tonight", "Simple evening routine"),
            post_json("a2", "Desk Yoga", "Stretches for a sleepy afternoon"),
            post_json("a3", "Protein Basics", "What to eat after training"),
        ],
        ..StubBehavior::default()
    })
    .await;

    let (status, html) = site.get_text("/blog/results?q=SLEEP").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(card_count(&html), 2);
    assert!(html.contains("Better Sleep Tonight"));
    assert!(html.contains("Desk Yoga"));
    assert!(!html.contains("Protein Basics"));

    let (_, html) = site.get_text("/blog/results?q=kettlebell").await;
    assert_eq!(card_count(&html), 0);
    assert!(html.contains("No articles match"));
}

#[tokio::test]
async fn test_pages_hold_six_posts() {
    let (site, _stub) = spawn(StubBehavior {
        posts: posts(8),
        ..StubBehavior::default()
    })
    .await;

    let (_, first) = site.get_text("/blog").await;
    assert_eq!(card_count(&first), 6);
    assert!(first.contains("href=\"/blog?page=2\""));

    let (_, second) = site.get_text("/blog/results?page=2").await;
    assert_eq!(card_count(&second), 2);
    assert!(second.contains("Article 7"));
    assert!(second.contains("Article 8"));
}

#[tokio::test]
async fn test_out_of_range_page_is_clamped() {
    let (site, _stub) = spawn(StubBehavior {
        posts: posts(8),
        ..StubBehavior::default()
    })
    .await;

    let (status, html) = site.get_text("/blog/results?page=99").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(card_count(&html), 2);

    let (status, html) = site.get_text("/blog/results?page=abc").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(card_count(&html), 6);
}

#[tokio::test]
async fn test_post_detail_renders_body() {
    let (site, stub) = spawn(StubBehavior {
        posts: vec![post_json("a1", "Morning Pranayama", "Breathing drills")],
        ..StubBehavior::default()
    })
    .await;

    let (status, html) = site.get_text("/blog/a1").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("<p>Morning Pranayama in depth.</p>"));
    assert!(html.contains("class=\"share-button\""));
    assert!(html.contains("data-share-title=\"Morning Pranayama\""));
    assert!(html.contains("data-share-text=\"Breathing drills\""));
    assert!(html.contains("/static/js/derived/blog."));
    assert_eq!(stub.log.entries(), vec!["/api/v1/get-blog/a1".to_string()]);
}

#[tokio::test]
async fn test_missing_post_is_not_found() {
    let (site, _stub) = spawn(StubBehavior::default()).await;

    let (status, html) = site.get_text("/blog/does-not-exist").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(html.contains("Article not found"));
    assert!(html.contains("href=\"/blog\""));
}
