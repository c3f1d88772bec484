//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check
//! GET  /services/{slug}        - Service detail
//!
//! # Blog
//! GET  /blog                   - Blog list (?category=&q=&page=)
//! GET  /blog/results           - Results fragment for live search
//! GET  /blog/{id}              - Blog post
//!
//! # Questionnaire
//! GET  /questionnaire          - Intake form
//! POST /questionnaire          - Validate and submit (rate limited)
//! GET  /questionnaire/thanks   - Thank-you page
//!
//! # Cart
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add an offering
//! POST /cart/update            - Change quantity (0 removes)
//! POST /cart/remove            - Remove a line
//!
//! # Checkout
//! GET  /checkout               - Order summary
//! POST /checkout/start         - Start an attempt (JSON, rate limited)
//! POST /checkout/verify        - Verify payment (JSON, rate limited)
//! POST /checkout/abandon       - Widget dismissed
//! GET  /checkout/complete      - Thank-you page
//! GET  /checkout/sdk.js        - Payment widget script
//! ```

pub mod blog;
pub mod cart;
pub mod checkout;
pub mod health;
pub mod home;
pub mod questionnaire;
pub mod services;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::{checkout_rate_limiter, form_rate_limiter};
use crate::state::AppState;

/// Create the blog routes router.
pub fn blog_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(blog::index))
        .route("/results", get(blog::results))
        .route("/{id}", get(blog::show))
}

/// Create the questionnaire routes router.
pub fn questionnaire_routes() -> Router<AppState> {
    let submit = Router::new()
        .route("/", post(questionnaire::submit))
        .route_layer(form_rate_limiter());

    Router::new()
        .route("/", get(questionnaire::show))
        .route("/thanks", get(questionnaire::thanks))
        .merge(submit)
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    let payment = Router::new()
        .route("/start", post(checkout::start))
        .route("/verify", post(checkout::verify))
        .route_layer(checkout_rate_limiter());

    Router::new()
        .route("/", get(checkout::show))
        .route("/abandon", post(checkout::abandon))
        .route("/complete", get(checkout::complete))
        .route("/sdk.js", get(checkout::sdk))
        .merge(payment)
}

/// Create all routes for the site.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .route("/services/{slug}", get(services::show))
        .nest("/blog", blog_routes())
        .nest("/questionnaire", questionnaire_routes())
        .nest("/cart", cart_routes())
        .nest("/checkout", checkout_routes())
}
