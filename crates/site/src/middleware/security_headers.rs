//! Security headers middleware.
//!
//! Pages are locked down except where the payment widget needs room: it runs
//! scripts and frames from the provider's domains, talks to its API, and may
//! open bank or UPI pop-ups.

use axum::{
    extract::Request,
    http::{
        HeaderName, HeaderValue,
        header::{
            CACHE_CONTROL, CONTENT_SECURITY_POLICY, REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS,
            X_FRAME_OPTIONS,
        },
    },
    middleware::Next,
    response::Response,
};

use super::csp::CspNonce;

/// Origins the payment widget loads frames and scripts from.
const PAYMENT_ORIGINS: &str = "https://checkout.razorpay.com https://api.razorpay.com";

/// Build the CSP for a response.
///
/// With a nonce, scripts must carry it (`'strict-dynamic'` extends trust to
/// scripts they load). Without one, only same-origin scripts run.
#[must_use]
pub fn content_security_policy(nonce: Option<&CspNonce>) -> String {
    let script_src = nonce.map_or_else(
        || format!("'self' {PAYMENT_ORIGINS}"),
        |nonce| format!("{} 'strict-dynamic' 'self' {PAYMENT_ORIGINS}", nonce.source()),
    );

    format!(
        "default-src 'none'; \
         script-src {script_src}; \
         style-src 'self' 'unsafe-inline'; \
         font-src 'self'; \
         img-src 'self' https: data:; \
         connect-src 'self' https://*.razorpay.com; \
         frame-src {PAYMENT_ORIGINS}; \
         object-src 'none'; \
         base-uri 'self'; \
         form-action 'self'; \
         frame-ancestors 'none'"
    )
}

/// Add security headers to all responses.
///
/// Headers applied:
/// - `X-Frame-Options: DENY`
/// - `X-Content-Type-Options: nosniff`
/// - `Referrer-Policy: strict-origin-when-cross-origin` (the payment provider
///   checks the merchant origin)
/// - `Content-Security-Policy` from [`content_security_policy`]
/// - `Permissions-Policy` denying everything but payment
/// - `Cache-Control: no-store` unless the handler set its own
/// - `Cross-Origin-Opener-Policy: same-origin-allow-popups`
pub async fn security_headers_middleware(request: Request, next: Next) -> Response {
    let nonce = request.extensions().get::<CspNonce>().cloned();
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    headers.insert(
        REFERRER_POLICY,
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );

    if let Ok(value) = HeaderValue::from_str(&content_security_policy(nonce.as_ref())) {
        headers.insert(CONTENT_SECURITY_POLICY, value);
    }

    headers.insert(
        HeaderName::from_static("permissions-policy"),
        HeaderValue::from_static(
            "camera=(), \
             geolocation=(), \
             microphone=(), \
             usb=(), \
             browsing-topics=(), \
             payment=(self \"https://api.razorpay.com\")",
        ),
    );

    if !headers.contains_key(CACHE_CONTROL) {
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store, max-age=0"));
    }

    headers.insert(
        HeaderName::from_static("cross-origin-opener-policy"),
        HeaderValue::from_static("same-origin-allow-popups"),
    );

    response
}
