//! Core types for Prana.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod blog;
pub mod email;
pub mod goal;
pub mod id;
pub mod money;
pub mod order;
pub mod phone;
pub mod status;

pub use blog::{BlogCategory, BlogPost, CategoryFilter};
pub use email::{Email, EmailError};
pub use goal::{Goal, GoalSet, UnknownGoal};
pub use id::*;
pub use money::Rupees;
pub use order::{CartLine, GST_RATE_PERCENT, OrderDraft};
pub use phone::{Phone, PhoneError};
pub use status::CheckoutStatus;
