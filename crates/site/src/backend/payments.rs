//! Order creation, public key and payment verification endpoints.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use prana_core::{OrderId, PaymentId, Rupees};

use super::{BackendClient, BackendError};

/// An order the backend created with the payment provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedOrder {
    pub id: OrderId,
    /// Amount in the smallest currency unit, as the provider expects it.
    pub amount: u64,
    pub currency: String,
}

/// Identifiers the payment widget hands back after a successful payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentConfirmation {
    pub razorpay_order_id: OrderId,
    pub razorpay_payment_id: PaymentId,
    pub razorpay_signature: String,
}

#[derive(Serialize)]
struct CreateOrderRequest {
    amount: u64,
}

#[derive(Deserialize)]
struct CreateOrderResponse {
    #[serde(default)]
    success: bool,
    order: Option<CreatedOrder>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Deserialize)]
struct KeyResponse {
    key: String,
}

#[derive(Deserialize)]
struct VerifyResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

impl BackendClient {
    /// Ask the backend to create an order for `amount`.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure, non-success status,
    /// `success: false` or a missing order.
    #[instrument(skip(self), fields(amount = %amount))]
    pub async fn create_order(&self, amount: Rupees) -> Result<CreatedOrder, BackendError> {
        let body = CreateOrderRequest {
            amount: amount.get(),
        };
        let response: CreateOrderResponse = self.post_json("/create-order", &body).await?;

        if !response.success {
            return Err(BackendError::Rejected(
                response
                    .message
                    .unwrap_or_else(|| "order not created".to_string()),
            ));
        }

        response
            .order
            .ok_or_else(|| BackendError::Parse("success without order".to_string()))
    }

    /// Fetch the public key the widget is opened with.
    ///
    /// The key is passed through as-is.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure, non-success status or a body
    /// without a `key` field.
    #[instrument(skip(self))]
    pub async fn get_key(&self) -> Result<String, BackendError> {
        let response: KeyResponse = self.get_json("/get-key").await?;
        Ok(response.key)
    }

    /// Ask the backend to verify a payment signature.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure, non-success status or
    /// `success: false`.
    #[instrument(skip(self, confirmation), fields(order_id = %confirmation.razorpay_order_id))]
    pub async fn verify_payment(
        &self,
        confirmation: &PaymentConfirmation,
    ) -> Result<(), BackendError> {
        let response: VerifyResponse = self.post_json("/verify-payment", confirmation).await?;

        if response.success {
            Ok(())
        } else {
            Err(BackendError::Rejected(
                response
                    .message
                    .unwrap_or_else(|| "verification failed".to_string()),
            ))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_created_order_accepts_numeric_amount() {
        let order: CreatedOrder = serde_json::from_str(
            r#"{"id":"order_Nx1","amount":118000,"currency":"INR","receipt":"r1"}"#,
        )
        .unwrap();
        assert_eq!(order.id.as_str(), "order_Nx1");
        assert_eq!(order.amount, 118_000);
    }

    #[test]
    fn test_confirmation_uses_provider_field_names() {
        let confirmation = PaymentConfirmation {
            razorpay_order_id: "order_1".into(),
            razorpay_payment_id: "pay_1".into(),
            razorpay_signature: "sig".to_string(),
        };
        let json = serde_json::to_value(&confirmation).unwrap();
        assert_eq!(json["razorpay_order_id"], "order_1");
        assert_eq!(json["razorpay_payment_id"], "pay_1");
        assert_eq!(json["razorpay_signature"], "sig");
    }

    #[tokio::test]
    async fn test_create_order_unreachable_backend_is_http_error() {
        let client = BackendClient::new(&crate::config::test_config().backend);
        let err = client.create_order(Rupees::new(100)).await.unwrap_err();
        assert!(matches!(err, BackendError::Http(_)));
    }
}
