//! Per-request CSP nonce.
//!
//! Every page's `<script>` tags carry the request's nonce. The CSP header
//! trusts that nonce with `'strict-dynamic'`, which also trusts scripts the
//! nonced scripts insert (the payment widget loader and the widget's own
//! follow-up scripts).

use axum::{
    extract::{FromRequestParts, Request},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use base64::{Engine, engine::general_purpose::STANDARD};
use rand::RngCore;

/// A 128-bit random nonce, base64-encoded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CspNonce(pub String);

impl CspNonce {
    /// Generate a new random nonce.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0u8; 16];
        rand::rng().fill_bytes(&mut bytes);
        Self(STANDARD.encode(bytes))
    }

    /// The nonce as written in `<script nonce="...">`.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }

    /// The nonce as a CSP source expression (`'nonce-...'`).
    #[must_use]
    pub fn source(&self) -> String {
        format!("'nonce-{}'", self.0)
    }
}

/// Store a fresh nonce in the request extensions.
///
/// Must be layered outside `security_headers_middleware`, which reads the
/// nonce back when it writes the CSP header.
pub async fn csp_nonce_middleware(mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(CspNonce::generate());
    next.run(request).await
}

impl<S> FromRequestParts<S> for CspNonce
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<Self>().cloned().unwrap_or_else(|| {
            tracing::warn!("CSP nonce missing from request extensions");
            Self(String::new())
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nonces_differ() {
        assert_ne!(CspNonce::generate(), CspNonce::generate());
    }

    #[test]
    fn test_nonce_is_base64_of_16_bytes() {
        let nonce = CspNonce::generate();
        assert_eq!(nonce.value().len(), 24);
        assert_eq!(STANDARD.decode(nonce.value()).map(|b| b.len()).ok(), Some(16));
    }

    #[test]
    fn test_source_expression() {
        let nonce = CspNonce("abc=".to_string());
        assert_eq!(nonce.source(), "'nonce-abc='");
    }
}
