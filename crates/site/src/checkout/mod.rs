//! Checkout orchestration.
//!
//! One [`CheckoutAttempt`] walks the order through the backend and the
//! payment widget:
//!
//! 1. create an order for the cart total
//! 2. fetch the widget's public key
//! 3. make sure the widget script is loaded
//! 4. hand widget options to the browser and wait for its callback
//! 5. have the backend verify the payment
//!
//! Every failure is final for the attempt. Nothing is retried; the visitor
//! starts a new attempt instead.

mod widget;

use std::future::Future;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use prana_core::{CartLine, CheckoutStatus, OrderId, Rupees};

use crate::backend::{BackendClient, BackendError, CreatedOrder, PaymentConfirmation};
use crate::config::PaymentConfig;

pub use widget::{Prefill, WidgetOptions, WidgetScript, WidgetScriptError};

/// Shown when payment verification succeeds.
pub const PAYMENT_SUCCESS_MESSAGE: &str = "Payment Successful!";

/// Backend calls a checkout needs.
pub trait PaymentGateway: Send + Sync {
    fn create_order(
        &self,
        amount: Rupees,
    ) -> impl Future<Output = Result<CreatedOrder, BackendError>> + Send;

    fn get_key(&self) -> impl Future<Output = Result<String, BackendError>> + Send;

    fn verify_payment(
        &self,
        confirmation: &PaymentConfirmation,
    ) -> impl Future<Output = Result<(), BackendError>> + Send;
}

impl PaymentGateway for BackendClient {
    fn create_order(
        &self,
        amount: Rupees,
    ) -> impl Future<Output = Result<CreatedOrder, BackendError>> + Send {
        Self::create_order(self, amount)
    }

    fn get_key(&self) -> impl Future<Output = Result<String, BackendError>> + Send {
        Self::get_key(self)
    }

    fn verify_payment(
        &self,
        confirmation: &PaymentConfirmation,
    ) -> impl Future<Output = Result<(), BackendError>> + Send {
        Self::verify_payment(self, confirmation)
    }
}

/// Errors that end (or refuse to start) a checkout attempt.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("order creation failed: {0}")]
    CreateOrder(#[source] BackendError),

    #[error("key retrieval failed: {0}")]
    Key(#[source] BackendError),

    #[error("widget script failed to load: {0}")]
    WidgetScript(#[from] WidgetScriptError),

    #[error("payment verification failed: {0}")]
    Verification(#[source] BackendError),

    #[error("confirmation is for order {0}, not the open attempt")]
    OrderMismatch(OrderId),

    #[error("no payment awaiting confirmation (attempt is {0})")]
    NotAwaitingPayment(CheckoutStatus),

    #[error("illegal checkout transition {from} -> {to}")]
    IllegalTransition {
        from: CheckoutStatus,
        to: CheckoutStatus,
    },
}

impl CheckoutError {
    /// Message shown to the visitor.
    #[must_use]
    pub const fn alert(&self) -> &'static str {
        match self {
            Self::EmptyCart => "Your cart is empty.",
            Self::CreateOrder(_) => "Failed to create order.",
            Self::Key(_) | Self::IllegalTransition { .. } => {
                "Could not start payment. Please try again."
            }
            Self::WidgetScript(_) => "Razorpay SDK failed to load.",
            Self::Verification(_) | Self::OrderMismatch(_) => "Payment Verification Failed!",
            Self::NotAwaitingPayment(_) => "No payment is in progress.",
        }
    }
}

/// Order details kept while the widget is open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSession {
    pub order_id: OrderId,
    pub amount: u64,
    pub currency: String,
    pub key: String,
}

/// One run of create-order through verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutAttempt {
    id: Uuid,
    status: CheckoutStatus,
    session: Option<PaymentSession>,
}

impl Default for CheckoutAttempt {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckoutAttempt {
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            status: CheckoutStatus::Idle,
            session: None,
        }
    }

    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub const fn status(&self) -> CheckoutStatus {
        self.status
    }

    /// The open payment, while the widget is showing.
    #[must_use]
    pub const fn session(&self) -> Option<&PaymentSession> {
        self.session.as_ref()
    }

    fn advance(&mut self, next: CheckoutStatus) -> Result<(), CheckoutError> {
        if !self.status.can_transition_to(next) {
            return Err(CheckoutError::IllegalTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        if next.is_terminal() {
            self.session = None;
        }
        Ok(())
    }

    /// Mark the attempt failed and hand the error back.
    fn fail(&mut self, error: CheckoutError) -> CheckoutError {
        warn!(attempt_id = %self.id, from = %self.status, error = %error, "Checkout attempt failed");
        if self.status.can_transition_to(CheckoutStatus::Failed) {
            self.status = CheckoutStatus::Failed;
        }
        self.session = None;
        error
    }

    /// Close an open widget without paying.
    ///
    /// Returns `false` (and changes nothing) unless the widget was open.
    pub fn abandon(&mut self) -> bool {
        if self.advance(CheckoutStatus::Abandoned).is_ok() {
            info!(attempt_id = %self.id, "Checkout abandoned");
            true
        } else {
            false
        }
    }
}

/// Drives checkout attempts against a gateway and the widget script.
pub struct Checkout<'a, G> {
    gateway: &'a G,
    script: &'a WidgetScript,
    payment: &'a PaymentConfig,
}

impl<'a, G: PaymentGateway> Checkout<'a, G> {
    #[must_use]
    pub const fn new(gateway: &'a G, script: &'a WidgetScript, payment: &'a PaymentConfig) -> Self {
        Self {
            gateway,
            script,
            payment,
        }
    }

    /// Run an idle attempt up to the open widget.
    ///
    /// `total` is the amount the order is created for, as shown to the
    /// visitor. An empty cart is refused before any network call.
    ///
    /// # Errors
    ///
    /// Returns the step that failed; the attempt is then `Failed`.
    #[instrument(skip_all, fields(attempt_id = %attempt.id(), total = %total))]
    pub async fn start(
        &self,
        attempt: &mut CheckoutAttempt,
        lines: &[CartLine],
        total: Rupees,
        prefill: Prefill,
    ) -> Result<WidgetOptions, CheckoutError> {
        if lines.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        attempt.advance(CheckoutStatus::CreatingOrder)?;
        let order = self
            .gateway
            .create_order(total)
            .await
            .map_err(|e| attempt.fail(CheckoutError::CreateOrder(e)))?;

        attempt.advance(CheckoutStatus::AwaitingKey)?;
        let key = self
            .gateway
            .get_key()
            .await
            .map_err(|e| attempt.fail(CheckoutError::Key(e)))?;

        attempt.advance(CheckoutStatus::LoadingWidgetScript)?;
        self.script
            .acquire()
            .await
            .map_err(|e| attempt.fail(CheckoutError::WidgetScript(e)))?;

        let options = WidgetOptions::new(self.payment, &order, key.clone(), lines, prefill);
        attempt.session = Some(PaymentSession {
            order_id: order.id,
            amount: order.amount,
            currency: order.currency,
            key,
        });
        attempt.advance(CheckoutStatus::WidgetOpen)?;

        info!(order_id = %options.order_id, "Payment widget ready");
        Ok(options)
    }

    /// Verify the widget's confirmation for an open attempt.
    ///
    /// On success the attempt is `Completed` and `on_complete` runs; a
    /// completed attempt refuses further confirmations, so it runs at most
    /// once. A confirmation for another order is refused without touching
    /// the attempt.
    ///
    /// # Errors
    ///
    /// Returns an error when nothing is awaiting payment, the order does not
    /// match, or the backend does not confirm the payment (the attempt is
    /// then `Failed`).
    #[instrument(skip_all, fields(attempt_id = %attempt.id(), order_id = %confirmation.razorpay_order_id))]
    pub async fn verify<F, Fut>(
        &self,
        attempt: &mut CheckoutAttempt,
        confirmation: &PaymentConfirmation,
        on_complete: F,
    ) -> Result<(), CheckoutError>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = ()> + Send,
    {
        if attempt.status != CheckoutStatus::WidgetOpen {
            return Err(CheckoutError::NotAwaitingPayment(attempt.status));
        }
        if attempt.session.as_ref().map(|s| &s.order_id) != Some(&confirmation.razorpay_order_id) {
            warn!("Confirmation does not match the open order");
            return Err(CheckoutError::OrderMismatch(
                confirmation.razorpay_order_id.clone(),
            ));
        }

        attempt.advance(CheckoutStatus::Verifying)?;
        self.gateway
            .verify_payment(confirmation)
            .await
            .map_err(|e| attempt.fail(CheckoutError::Verification(e)))?;
        attempt.advance(CheckoutStatus::Completed)?;

        info!("Payment verified");
        on_complete().await;
        Ok(())
    }
}
