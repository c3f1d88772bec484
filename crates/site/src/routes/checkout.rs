//! Checkout route handlers.
//!
//! ```text
//! GET  /checkout           - Order summary and pay button
//! POST /checkout/start     - Create order, load widget, return widget options (JSON)
//! POST /checkout/verify    - Verify the widget's confirmation (JSON)
//! POST /checkout/abandon   - Widget closed without paying
//! GET  /checkout/complete  - Thank-you page
//! GET  /checkout/sdk.js    - Payment widget script, served from this origin
//! ```

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::{error, info, instrument};

use prana_core::CheckoutStatus;

use crate::backend::PaymentConfirmation;
use crate::checkout::{
    Checkout, CheckoutAttempt, CheckoutError, PAYMENT_SUCCESS_MESSAGE, Prefill, WidgetOptions,
};
use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::middleware::CspNonce;
use crate::models::session::{clear_cart, load_attempt, load_cart, save_attempt};
use crate::routes::cart::{CartLineView, TotalsView};
use crate::state::AppState;

/// Shown under the total when it differs from the recomputed order total.
pub const ROUNDING_NOTE: &str = "Note: Displayed total may include rounding adjustments.";

/// Where the browser goes after a verified payment.
const COMPLETE_PATH: &str = "/checkout/complete";

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub nonce: String,
    pub lines: Vec<CartLineView>,
    pub totals: TotalsView,
    pub rounding_note: Option<&'static str>,
    pub can_checkout: bool,
}

/// Thank-you page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/complete.html")]
pub struct CheckoutCompleteTemplate {
    pub nonce: String,
}

/// Body of `POST /checkout/start`.
#[derive(Debug, Default, Deserialize)]
pub struct StartRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// Response of `POST /checkout/start`.
#[derive(Debug, Serialize)]
pub struct StartResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<WidgetOptions>,
}

/// Response of `POST /checkout/verify`.
#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub success: bool,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<&'static str>,
}

fn error_status(error: &CheckoutError) -> StatusCode {
    match error {
        CheckoutError::EmptyCart | CheckoutError::OrderMismatch(_) => StatusCode::BAD_REQUEST,
        CheckoutError::NotAwaitingPayment(_) => StatusCode::CONFLICT,
        CheckoutError::IllegalTransition { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        CheckoutError::CreateOrder(_)
        | CheckoutError::Key(_)
        | CheckoutError::WidgetScript(_)
        | CheckoutError::Verification(_) => StatusCode::BAD_GATEWAY,
    }
}

/// Display the order summary.
#[instrument(skip(session, nonce))]
pub async fn show(session: Session, CspNonce(nonce): CspNonce) -> impl IntoResponse {
    let cart = load_cart(&session).await;
    let draft = cart.draft();
    let displayed_total = draft.total;

    CheckoutTemplate {
        nonce,
        lines: cart.lines().iter().map(CartLineView::from).collect(),
        totals: TotalsView::from(&draft),
        rounding_note: draft
            .needs_rounding_note(displayed_total)
            .then_some(ROUNDING_NOTE),
        can_checkout: !cart.is_empty(),
    }
}

/// Run a new checkout attempt up to the open widget.
///
/// An open attempt from an earlier click is abandoned first.
///
/// # Errors
///
/// Returns 500 if the session cannot be written.
#[instrument(skip_all)]
pub async fn start(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<StartRequest>,
) -> Result<Response> {
    let cart = load_cart(&session).await;

    if let Some(mut previous) = load_attempt(&session).await
        && previous.abandon()
    {
        info!(attempt_id = %previous.id(), "Open checkout superseded by a new attempt");
        save_attempt(&session, &previous).await?;
    }

    let mut attempt = CheckoutAttempt::new();
    let checkout = Checkout::new(
        state.backend(),
        state.widget_script(),
        &state.config().payment,
    );
    let prefill = Prefill {
        name: request.name,
        email: request.email,
    };

    let result = checkout
        .start(&mut attempt, cart.lines(), cart.draft().total, prefill)
        .await;

    if attempt.status() != CheckoutStatus::Idle {
        save_attempt(&session, &attempt).await?;
    }

    let response = match result {
        Ok(options) => {
            add_breadcrumb("checkout", "Payment widget opened", None);
            Json(StartResponse {
                success: true,
                message: None,
                options: Some(options),
            })
            .into_response()
        }
        Err(e) => (
            error_status(&e),
            Json(StartResponse {
                success: false,
                message: Some(e.alert()),
                options: None,
            }),
        )
            .into_response(),
    };

    Ok(response)
}

/// Verify the payment the widget reported.
///
/// On success the cart is emptied and the browser is sent to the
/// thank-you page.
///
/// # Errors
///
/// Returns 500 if the session cannot be written.
#[instrument(skip_all)]
pub async fn verify(
    State(state): State<AppState>,
    session: Session,
    Json(confirmation): Json<PaymentConfirmation>,
) -> Result<Response> {
    let Some(mut attempt) = load_attempt(&session).await else {
        let e = CheckoutError::NotAwaitingPayment(CheckoutStatus::Idle);
        return Ok(verify_failure(&e));
    };

    let checkout = Checkout::new(
        state.backend(),
        state.widget_script(),
        &state.config().payment,
    );
    let session_ref = &session;
    let result = checkout
        .verify(&mut attempt, &confirmation, || async move {
            if let Err(e) = clear_cart(session_ref).await {
                error!(error = %e, "Failed to clear cart after payment");
            }
        })
        .await;

    save_attempt(&session, &attempt).await?;

    let response = match result {
        Ok(()) => {
            add_breadcrumb(
                "checkout",
                "Payment verified",
                Some(&[("order_id", confirmation.razorpay_order_id.as_str())]),
            );
            Json(VerifyResponse {
                success: true,
                message: PAYMENT_SUCCESS_MESSAGE,
                redirect: Some(COMPLETE_PATH),
            })
            .into_response()
        }
        Err(e) => verify_failure(&e),
    };

    Ok(response)
}

fn verify_failure(error: &CheckoutError) -> Response {
    (
        error_status(error),
        Json(VerifyResponse {
            success: false,
            message: error.alert(),
            redirect: None,
        }),
    )
        .into_response()
}

/// Record that the widget was closed without paying.
///
/// # Errors
///
/// Returns 500 if the session cannot be written.
#[instrument(skip_all)]
pub async fn abandon(session: Session) -> Result<StatusCode> {
    if let Some(mut attempt) = load_attempt(&session).await
        && attempt.abandon()
    {
        save_attempt(&session, &attempt).await?;
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Display the thank-you page.
pub async fn complete(CspNonce(nonce): CspNonce) -> impl IntoResponse {
    CheckoutCompleteTemplate { nonce }
}

/// Serve the payment widget script, loading it on first use.
///
/// # Errors
///
/// Returns 502 if the script cannot be loaded.
#[instrument(skip_all)]
pub async fn sdk(State(state): State<AppState>) -> Result<Response> {
    let script = state.widget_script().acquire().await?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/javascript; charset=utf-8"),
            (header::CACHE_CONTROL, "public, max-age=3600"),
        ],
        script,
    )
        .into_response())
}
