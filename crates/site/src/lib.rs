//! Prana Wellness public website.
//!
//! Server-rendered pages for the service catalog, blog, intake questionnaire,
//! cart and checkout. Content and payments are delegated to a remote backend,
//! payment capture to the Razorpay widget, and questionnaire storage to a
//! forms endpoint.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod backend;
pub mod blog;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod filters;
pub mod intake;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use axum::{Router, body::Body, http::Request, middleware::from_fn};
use tower_http::{services::ServeDir, trace::TraceLayer};

use state::AppState;

/// Static asset directory, relative to the workspace root.
pub const STATIC_DIR: &str = "crates/site/static";

/// Service catalog directory, relative to the workspace root.
pub const SERVICES_DIR: &str = "crates/site/content/services";

/// Build the full application router.
pub fn app(state: AppState, static_dir: &std::path::Path) -> Router {
    let session_layer = middleware::create_session_layer(state.config());

    Router::new()
        .merge(routes::routes())
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(session_layer)
        .layer(from_fn(middleware::security_headers_middleware))
        .layer(from_fn(middleware::csp_nonce_middleware))
        .layer(from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}
