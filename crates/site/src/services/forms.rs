//! Forms endpoint client for intake questionnaire submissions.
//!
//! The endpoint accepts one JSON document per submission. Success is judged
//! by HTTP status alone; the response body is ignored.

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use thiserror::Error;
use tracing::{info, instrument};

use crate::config::FormsConfig;
use crate::intake::IntakeRecord;

/// Errors that can occur when submitting a form.
#[derive(Debug, Error)]
pub enum FormsError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint answered with a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
}

/// Forms endpoint client.
#[derive(Clone)]
pub struct FormsClient {
    client: reqwest::Client,
    endpoint: String,
}

impl FormsClient {
    /// Create a new forms client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &FormsConfig) -> Result<Self, FormsError> {
        let mut headers = HeaderMap::new();

        // Ask for JSON instead of the hosted thank-you page
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }

    /// Submit a validated intake record. No retry.
    ///
    /// # Errors
    ///
    /// Returns error on network failure or a non-success status.
    #[instrument(skip(self, record), fields(goals = record.goals.len()))]
    pub async fn submit(&self, record: &IntakeRecord) -> Result<(), FormsError> {
        let response = self.client.post(&self.endpoint).json(record).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(FormsError::Api {
                status: status.as_u16(),
                message: message.chars().take(200).collect(),
            });
        }

        info!("Intake questionnaire submitted");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::intake::IntakeForm;

    use super::*;

    fn record() -> IntakeRecord {
        IntakeForm {
            name: "Meera".to_string(),
            email: "meera@example.com".to_string(),
            phone: "9123456789".to_string(),
            age: "34".to_string(),
            ..IntakeForm::default()
        }
        .into_record()
        .unwrap()
    }

    #[tokio::test]
    async fn test_submit_to_unreachable_endpoint_is_http_error() {
        let client = FormsClient::new(&crate::config::test_config().forms).unwrap();

        let err = client.submit(&record()).await.unwrap_err();
        assert!(matches!(err, FormsError::Http(_)), "{err}");
    }

    #[test]
    fn test_api_error_display() {
        let err = FormsError::Api {
            status: 422,
            message: "email is required".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 422 - email is required");
    }
}
