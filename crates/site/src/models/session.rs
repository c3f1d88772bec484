//! Typed access to session data.
//!
//! Read failures are treated as "nothing stored"; write failures are returned
//! so handlers can report them.

use tower_sessions::Session;

use super::cart::Cart;
use crate::checkout::CheckoutAttempt;

/// Session keys.
pub mod keys {
    /// The visitor's cart.
    pub const CART: &str = "cart";

    /// The most recent checkout attempt.
    pub const CHECKOUT_ATTEMPT: &str = "checkout_attempt";
}

/// Load the cart, empty if none is stored.
pub async fn load_cart(session: &Session) -> Cart {
    session
        .get::<Cart>(keys::CART)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// Store the cart.
///
/// # Errors
///
/// Returns an error if the session store rejects the write.
pub async fn save_cart(session: &Session, cart: &Cart) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::CART, cart).await
}

/// Empty the cart.
///
/// # Errors
///
/// Returns an error if the session store rejects the write.
pub async fn clear_cart(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.remove::<Cart>(keys::CART).await.map(|_| ())
}

/// Load the most recent checkout attempt, if any.
pub async fn load_attempt(session: &Session) -> Option<CheckoutAttempt> {
    session
        .get::<CheckoutAttempt>(keys::CHECKOUT_ATTEMPT)
        .await
        .ok()
        .flatten()
}

/// Store a checkout attempt, replacing the previous one.
///
/// # Errors
///
/// Returns an error if the session store rejects the write.
pub async fn save_attempt(
    session: &Session,
    attempt: &CheckoutAttempt,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::CHECKOUT_ATTEMPT, attempt).await
}
