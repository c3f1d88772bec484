//! Prana Core - Shared domain types.
//!
//! This crate provides the types used by the Prana wellness site:
//! - `site` - Public website (blog, intake questionnaire, cart and checkout)
//! - `integration-tests` - End-to-end tests against stub backends
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no templates. Validation rules and the order arithmetic live here
//! so they can be tested in isolation.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, money, emails, phones, goals,
//!   blog posts and checkout statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
