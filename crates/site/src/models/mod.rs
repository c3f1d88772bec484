//! Data kept in the visitor's session.

pub mod cart;
pub mod session;

pub use cart::Cart;
pub use session::keys as session_keys;
