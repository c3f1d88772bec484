//! Blog route handlers.
//!
//! The list page and the `/blog/results` fragment render the same results;
//! `static/js/blog.js` swaps the fragment in as the visitor types.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use tracing::instrument;

use prana_core::{BlogPost, CategoryFilter};

use crate::blog::{BlogListState, BlogQuery};
use crate::filters;
use crate::middleware::CspNonce;
use crate::state::AppState;

/// Post card for list pages.
#[derive(Clone)]
pub struct PostCardView {
    pub href: String,
    pub title: String,
    pub small_description: String,
    pub author_name: String,
    pub estimate_read_time: u32,
    pub category: String,
    pub image: Option<String>,
    pub published_on: Option<String>,
}

impl From<&BlogPost> for PostCardView {
    fn from(post: &BlogPost) -> Self {
        Self {
            href: format!("/blog/{}", urlencoding::encode(post.id.as_str())),
            title: post.title.clone(),
            small_description: post.small_description.clone(),
            author_name: post.author_name.clone(),
            estimate_read_time: post.estimate_read_time,
            category: capitalize_first(&post.category),
            image: post.blog_image.clone(),
            published_on: post.created_at.map(format_date),
        }
    }
}

/// Full post for the detail page.
pub struct PostDetailView {
    pub title: String,
    /// Teaser passed to the share sheet.
    pub small_description: String,
    pub author_name: String,
    pub estimate_read_time: u32,
    pub category: String,
    pub tags: Vec<String>,
    pub image: Option<String>,
    pub published_on: Option<String>,
    /// Pre-rendered HTML from the backend.
    pub body_html: String,
}

impl From<BlogPost> for PostDetailView {
    fn from(post: BlogPost) -> Self {
        Self {
            published_on: post.created_at.map(format_date),
            category: capitalize_first(&post.category),
            title: post.title,
            small_description: post.small_description,
            author_name: post.author_name,
            estimate_read_time: post.estimate_read_time,
            tags: post.tags,
            image: post.blog_image,
            body_html: post.main_description,
        }
    }
}

/// Category tab.
pub struct CategoryChoiceView {
    pub label: &'static str,
    pub href: String,
    pub active: bool,
}

/// Numbered pager link.
pub struct PageLinkView {
    pub number: usize,
    pub href: String,
    pub current: bool,
}

/// Everything inside the results container.
pub struct BlogResultsView {
    pub posts: Vec<PostCardView>,
    pub query: String,
    pub prev_href: Option<String>,
    pub next_href: Option<String>,
    pub pages: Vec<PageLinkView>,
}

impl BlogResultsView {
    fn build(state: &BlogListState, posts: &[BlogPost]) -> Self {
        let page = state.apply(posts);

        let prev_href = page
            .has_prev()
            .then(|| state.href_for_page(page.number - 1));
        let next_href = page
            .has_next()
            .then(|| state.href_for_page(page.number + 1));
        let pages = if page.total_pages > 1 {
            page.numbers()
                .map(|number| PageLinkView {
                    number,
                    href: state.href_for_page(number),
                    current: number == page.number,
                })
                .collect()
        } else {
            Vec::new()
        };

        Self {
            posts: page.items.into_iter().map(PostCardView::from).collect(),
            query: state.query().to_string(),
            prev_href,
            next_href,
            pages,
        }
    }
}

/// Blog index page template.
#[derive(Template, WebTemplate)]
#[template(path = "blog/index.html")]
pub struct BlogIndexTemplate {
    pub nonce: String,
    pub categories: Vec<CategoryChoiceView>,
    /// Label of the selected category, empty for `All`.
    pub category: String,
    pub query: String,
    pub results: BlogResultsView,
}

/// Results fragment template.
#[derive(Template, WebTemplate)]
#[template(path = "blog/_results.html")]
pub struct BlogResultsTemplate {
    pub results: BlogResultsView,
}

/// Blog post detail template.
#[derive(Template, WebTemplate)]
#[template(path = "blog/show.html")]
pub struct BlogShowTemplate {
    pub nonce: String,
    pub post: PostDetailView,
}

/// Missing post template.
#[derive(Template, WebTemplate)]
#[template(path = "blog/not_found.html")]
pub struct BlogNotFoundTemplate {
    pub nonce: String,
}

fn format_date(date: DateTime<Utc>) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Uppercase the first character and keep the rest as sent.
fn capitalize_first(value: &str) -> String {
    let mut chars = value.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

async fn load_results(app: &AppState, state: &BlogListState) -> BlogResultsView {
    let posts = app.backend().fetch_blogs(state.category()).await;
    BlogResultsView::build(state, &posts)
}

/// Display the blog list.
#[instrument(skip(app, nonce))]
pub async fn index(
    State(app): State<AppState>,
    Query(params): Query<BlogQuery>,
    CspNonce(nonce): CspNonce,
) -> impl IntoResponse {
    let state = BlogListState::from(params);
    let results = load_results(&app, &state).await;

    let categories = CategoryFilter::choices()
        .map(|choice| CategoryChoiceView {
            label: choice.label(),
            href: state.href_for_category(choice),
            active: choice == state.category(),
        })
        .collect();

    let category = match state.category() {
        CategoryFilter::All => String::new(),
        selected @ CategoryFilter::Only(_) => selected.label().to_string(),
    };

    BlogIndexTemplate {
        nonce,
        categories,
        category,
        query: state.query().to_string(),
        results,
    }
}

/// Results fragment for live search.
#[instrument(skip(app))]
pub async fn results(
    State(app): State<AppState>,
    Query(params): Query<BlogQuery>,
) -> impl IntoResponse {
    let state = BlogListState::from(params);
    BlogResultsTemplate {
        results: load_results(&app, &state).await,
    }
}

/// Display a single blog post.
///
/// Responds 404 with a link back to the list when the post cannot be fetched.
#[instrument(skip(app, nonce))]
pub async fn show(
    State(app): State<AppState>,
    Path(id): Path<String>,
    CspNonce(nonce): CspNonce,
) -> Response {
    match app.backend().fetch_blog_by_id(&id).await {
        Some(post) => BlogShowTemplate {
            nonce,
            post: PostDetailView::from(post),
        }
        .into_response(),
        None => (StatusCode::NOT_FOUND, BlogNotFoundTemplate { nonce }).into_response(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn post(category: &str, created_at: Option<&str>) -> BlogPost {
        serde_json::from_value(serde_json::json!({
            "id": "65f1c0ffee",
            "title": "Evening Wind-down",
            "smallDescription": "Slow stretches before sleep",
            "mainDescription": "<p>Breathe out.</p>",
            "category": category,
            "createdAt": created_at,
        }))
        .unwrap()
    }

    #[test]
    fn test_capitalize_first() {
        assert_eq!(capitalize_first("yoga"), "Yoga");
        assert_eq!(capitalize_first("mental health"), "Mental health");
        assert_eq!(capitalize_first("aYURVEDA"), "AYURVEDA");
        assert_eq!(capitalize_first(""), "");
    }

    #[test]
    fn test_card_view_capitalizes_category() {
        let card = PostCardView::from(&post("meditation", Some("2025-03-14T06:30:00Z")));
        assert_eq!(card.category, "Meditation");
        assert_eq!(card.href, "/blog/65f1c0ffee");
        assert_eq!(card.published_on.as_deref(), Some("March 14, 2025"));
    }

    #[test]
    fn test_detail_view_without_date() {
        let detail = PostDetailView::from(post("nutrition", None));
        assert_eq!(detail.category, "Nutrition");
        assert_eq!(detail.published_on, None);
        assert_eq!(detail.small_description, "Slow stretches before sleep");
    }

    #[test]
    fn test_show_template_offers_share_action() {
        let html = BlogShowTemplate {
            nonce: "n0nce".to_string(),
            post: PostDetailView::from(post("yoga", None)),
        }
        .render()
        .unwrap();

        assert!(html.contains(r#"class="share-button""#));
        assert!(html.contains(r#"data-share-title="Evening Wind-down""#));
        assert!(html.contains(r#"data-share-text="Slow stretches before sleep""#));
        assert!(html.contains(r#"<p class="tag">Yoga</p>"#));
        assert!(html.contains(r#"nonce="n0nce""#));
    }

    #[test]
    fn test_results_fragment_capitalizes_category() {
        let html = BlogResultsTemplate {
            results: BlogResultsView {
                posts: vec![PostCardView::from(&post("yoga", None))],
                query: String::new(),
                prev_href: None,
                next_href: None,
                pages: Vec::new(),
            },
        }
        .render()
        .unwrap();

        assert!(html.contains(r#"<p class="tag">Yoga</p>"#));
        assert!(!html.contains(">yoga<"));
    }
}
