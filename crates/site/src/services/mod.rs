//! Clients for third-party services other than the backend.
//!
//! - `forms` - Intake questionnaire submission (Formspree-compatible endpoint)

pub mod forms;

pub use forms::{FormsClient, FormsError};
