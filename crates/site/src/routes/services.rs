//! Service detail pages.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::CspNonce;
use crate::routes::home::OfferingCardView;
use crate::state::AppState;

/// Service detail template.
#[derive(Template, WebTemplate)]
#[template(path = "services/show.html")]
pub struct ServiceShowTemplate {
    pub nonce: String,
    pub offering: OfferingCardView,
    pub content_html: String,
}

/// Display one offering with an add-to-cart form.
///
/// # Errors
///
/// Returns 404 if no offering has this slug.
#[instrument(skip(state, nonce))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    CspNonce(nonce): CspNonce,
) -> Result<impl IntoResponse> {
    let offering = state
        .catalog()
        .get(&slug)
        .ok_or_else(|| AppError::NotFound(format!("service {slug}")))?;

    Ok(ServiceShowTemplate {
        nonce,
        offering: OfferingCardView::from(offering),
        content_html: offering.content_html.clone(),
    })
}
