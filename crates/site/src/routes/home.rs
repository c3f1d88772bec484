//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use prana_core::CategoryFilter;

use crate::catalog::Offering;
use crate::filters;
use crate::middleware::CspNonce;
use crate::routes::blog::PostCardView;
use crate::state::AppState;

/// Number of recent posts shown on the home page.
const LATEST_POSTS_COUNT: usize = 3;

/// Offering card.
#[derive(Clone)]
pub struct OfferingCardView {
    pub slug: String,
    pub name: String,
    pub summary: String,
    pub duration: Option<String>,
    pub price: String,
}

impl From<&Offering> for OfferingCardView {
    fn from(offering: &Offering) -> Self {
        Self {
            slug: offering.slug.clone(),
            name: offering.meta.name.clone(),
            summary: offering.meta.summary.clone(),
            duration: offering.meta.duration.clone(),
            price: offering.meta.price.to_string(),
        }
    }
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub nonce: String,
    pub offerings: Vec<OfferingCardView>,
    pub latest_posts: Vec<PostCardView>,
}

/// Display the home page.
#[instrument(skip(state, nonce))]
pub async fn home(State(state): State<AppState>, CspNonce(nonce): CspNonce) -> impl IntoResponse {
    let offerings = state.catalog().all().map(OfferingCardView::from).collect();

    let latest_posts = state
        .backend()
        .fetch_blogs(CategoryFilter::All)
        .await
        .iter()
        .take(LATEST_POSTS_COUNT)
        .map(PostCardView::from)
        .collect();

    HomeTemplate {
        nonce,
        offerings,
        latest_posts,
    }
}
