//! The payment widget: its script and the options it is opened with.
//!
//! The widget script is fetched from the payment provider at most once per
//! process and then served from this origin at `/checkout/sdk.js`.

use axum::body::Bytes;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::{info, instrument};

use prana_core::{CartLine, OrderId};

use crate::backend::CreatedOrder;
use crate::config::PaymentConfig;

/// Description shown under the merchant name in the widget.
const ORDER_DESCRIPTION: &str = "Order Checkout";

/// Errors that can occur while loading the widget script.
#[derive(Debug, Error)]
pub enum WidgetScriptError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider answered with a non-success status.
    #[error("unexpected status {0}")]
    Status(u16),

    /// Provider answered with an empty body.
    #[error("empty script")]
    Empty,
}

/// Acquire-once handle on the widget script.
///
/// The first caller fetches the script; callers arriving while that fetch is
/// in flight wait for it; everyone after that gets the cached bytes. A failed
/// fetch leaves nothing behind, so the next caller starts a fresh one.
pub struct WidgetScript {
    client: reqwest::Client,
    url: String,
    script: OnceCell<Bytes>,
}

impl WidgetScript {
    #[must_use]
    pub fn new(client: reqwest::Client, config: &PaymentConfig) -> Self {
        Self {
            client,
            url: config.sdk_url.clone(),
            script: OnceCell::new(),
        }
    }

    /// A handle whose script is already loaded.
    #[cfg(test)]
    pub(crate) fn preloaded(script: &'static str) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: String::new(),
            script: OnceCell::new_with(Some(Bytes::from_static(script.as_bytes()))),
        }
    }

    /// Get the script, loading it if nobody has yet.
    ///
    /// # Errors
    ///
    /// Returns an error when the load this call started or waited on failed.
    pub async fn acquire(&self) -> Result<Bytes, WidgetScriptError> {
        self.script
            .get_or_try_init(|| self.fetch())
            .await
            .cloned()
    }

    /// Whether the script has been loaded.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.script.initialized()
    }

    #[instrument(skip(self), fields(url = %self.url))]
    async fn fetch(&self) -> Result<Bytes, WidgetScriptError> {
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(WidgetScriptError::Status(status.as_u16()));
        }

        let script = response.bytes().await?;
        if script.is_empty() {
            return Err(WidgetScriptError::Empty);
        }

        info!(bytes = script.len(), "Payment widget script loaded");
        Ok(script)
    }
}

/// Name and email the widget form is pre-filled with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prefill {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notes {
    /// JSON-encoded `[{name, quantity}]` of the cart lines.
    pub items: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Theme {
    pub color: String,
}

#[derive(Serialize)]
struct NoteItem<'a> {
    name: &'a str,
    quantity: u32,
}

/// Options the browser opens the widget with.
///
/// The `handler` and `modal.ondismiss` callbacks are attached in the browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WidgetOptions {
    pub key: String,
    pub amount: u64,
    pub currency: String,
    pub name: String,
    pub description: String,
    pub order_id: OrderId,
    pub prefill: Prefill,
    pub notes: Notes,
    pub theme: Theme,
}

impl WidgetOptions {
    #[must_use]
    pub fn new(
        config: &PaymentConfig,
        order: &CreatedOrder,
        key: String,
        lines: &[CartLine],
        prefill: Prefill,
    ) -> Self {
        let items: Vec<NoteItem<'_>> = lines
            .iter()
            .map(|line| NoteItem {
                name: &line.name,
                quantity: line.quantity.get(),
            })
            .collect();

        Self {
            key,
            amount: order.amount,
            currency: order.currency.clone(),
            name: config.brand_name.clone(),
            description: ORDER_DESCRIPTION.to_string(),
            order_id: order.id.clone(),
            prefill,
            notes: Notes {
                items: serde_json::to_string(&items).unwrap_or_else(|_| "[]".to_string()),
            },
            theme: Theme {
                color: config.theme_color.clone(),
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::num::NonZeroU32;

    use prana_core::Rupees;

    use super::*;
    use crate::config::test_config;

    #[test]
    fn test_options_carry_order_and_items() {
        let config = test_config().payment;
        let order = CreatedOrder {
            id: "order_9".into(),
            amount: 94_400,
            currency: "INR".to_string(),
        };
        let lines = [CartLine {
            id: "yoga-class".to_string(),
            name: "Yoga Class".to_string(),
            unit_price: Rupees::new(800),
            quantity: NonZeroU32::new(1).unwrap(),
        }];
        let options = WidgetOptions::new(&config, &order, "rzp_test".into(), &lines, Prefill::default());

        let json = serde_json::to_value(&options).unwrap();
        assert_eq!(json["key"], "rzp_test");
        assert_eq!(json["amount"], 94_400);
        assert_eq!(json["order_id"], "order_9");
        assert_eq!(json["description"], "Order Checkout");
        assert_eq!(json["theme"]["color"], "#1976d2");
        assert_eq!(
            json["notes"]["items"],
            r#"[{"name":"Yoga Class","quantity":1}]"#
        );
    }

    #[tokio::test]
    async fn test_failed_load_leaves_script_unloaded() {
        let script = WidgetScript::new(reqwest::Client::new(), &test_config().payment);
        assert!(script.acquire().await.is_err());
        assert!(!script.is_loaded());
    }

    #[tokio::test]
    async fn test_preloaded_script_is_returned() {
        let script = WidgetScript::preloaded("window.Razorpay = function () {};");
        assert!(script.is_loaded());
        assert!(script.acquire().await.unwrap().starts_with(b"window.Razorpay"));
    }
}
