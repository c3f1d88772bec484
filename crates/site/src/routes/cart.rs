//! Cart route handlers.
//!
//! The cart lives in the session. Every change redirects back to `/cart`.

use std::num::NonZeroU32;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use prana_core::{CartLine, OrderDraft};

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::CspNonce;
use crate::models::session::{load_cart, save_cart};
use crate::state::AppState;

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartLineView {
    pub id: String,
    pub name: String,
    pub unit_price: String,
    pub quantity: u32,
    pub line_total: String,
}

impl From<&CartLine> for CartLineView {
    fn from(line: &CartLine) -> Self {
        Self {
            id: line.id.clone(),
            name: line.name.clone(),
            unit_price: line.unit_price.to_string(),
            quantity: line.quantity.get(),
            line_total: line.line_total().to_string(),
        }
    }
}

/// Subtotal, GST and total as display strings.
#[derive(Clone)]
pub struct TotalsView {
    pub subtotal: String,
    pub tax: String,
    pub total: String,
    pub gst_rate: u32,
}

impl From<&OrderDraft> for TotalsView {
    fn from(draft: &OrderDraft) -> Self {
        Self {
            subtotal: draft.subtotal.to_string(),
            tax: draft.tax.to_string(),
            total: draft.total.to_string(),
            gst_rate: prana_core::GST_RATE_PERCENT,
        }
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub slug: String,
    pub quantity: Option<u32>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub id: String,
    pub quantity: u32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub id: String,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub nonce: String,
    pub lines: Vec<CartLineView>,
    pub item_count: u32,
    pub totals: TotalsView,
}

/// Display the cart page.
#[instrument(skip(session, nonce))]
pub async fn show(session: Session, CspNonce(nonce): CspNonce) -> impl IntoResponse {
    let cart = load_cart(&session).await;

    CartShowTemplate {
        nonce,
        lines: cart.lines().iter().map(CartLineView::from).collect(),
        item_count: cart.item_count(),
        totals: TotalsView::from(&cart.draft()),
    }
}

/// Add an offering to the cart.
///
/// # Errors
///
/// Returns 400 for an unknown offering or a zero quantity.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Redirect> {
    let offering = state
        .catalog()
        .get(&form.slug)
        .ok_or_else(|| AppError::BadRequest(format!("unknown service {}", form.slug)))?;
    let quantity = NonZeroU32::new(form.quantity.unwrap_or(1))
        .ok_or_else(|| AppError::BadRequest("quantity must be at least 1".to_string()))?;

    let mut cart = load_cart(&session).await;
    cart.add(offering.to_cart_line(quantity));
    save_cart(&session, &cart).await?;

    Ok(Redirect::to("/cart"))
}

/// Change a line's quantity; zero removes it.
///
/// # Errors
///
/// Returns 500 if the session cannot be written.
#[instrument(skip(session))]
pub async fn update(session: Session, Form(form): Form<UpdateCartForm>) -> Result<Redirect> {
    let mut cart = load_cart(&session).await;
    if cart.set_quantity(&form.id, form.quantity) {
        save_cart(&session, &cart).await?;
    }
    Ok(Redirect::to("/cart"))
}

/// Remove a line.
///
/// # Errors
///
/// Returns 500 if the session cannot be written.
#[instrument(skip(session))]
pub async fn remove(session: Session, Form(form): Form<RemoveFromCartForm>) -> Result<Redirect> {
    let mut cart = load_cart(&session).await;
    if cart.remove(&form.id) {
        save_cart(&session, &cart).await?;
    }
    Ok(Redirect::to("/cart"))
}
