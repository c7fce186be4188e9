//! Payment processing seam.
//!
//! Checkout talks to payment providers through [`PaymentProcessor`]. The
//! only shipped processor is [`SimulatedPayment`], which waits for a fixed
//! delay and always approves.

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use estimator_core::{OrderId, PaymentMethod};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{info, instrument};

/// Amount to charge for an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRequest {
    pub order_id: OrderId,
    pub method: PaymentMethod,
    pub amount: Decimal,
}

/// Proof of an approved payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentReceipt {
    pub reference: String,
    pub processed_at: DateTime<Utc>,
}

/// A payment attempt failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PaymentError {
    #[error("payment declined: {0}")]
    Declined(String),

    #[error("payment provider unavailable: {0}")]
    Unavailable(String),
}

/// Something that can charge a customer.
pub trait PaymentProcessor: Send + Sync {
    /// Charge the order amount.
    fn process(
        &self,
        request: &PaymentRequest,
    ) -> impl Future<Output = Result<PaymentReceipt, PaymentError>> + Send;
}

/// Demo processor: sleeps for `delay`, then approves.
#[derive(Debug, Clone, Copy)]
pub struct SimulatedPayment {
    delay: Duration,
}

impl SimulatedPayment {
    /// Default processing time.
    pub const DEFAULT_DELAY: Duration = Duration::from_secs(3);

    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self { delay }
    }

    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for SimulatedPayment {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DELAY)
    }
}

impl PaymentProcessor for SimulatedPayment {
    #[instrument(skip(self, request), fields(order_id = %request.order_id, method = %request.method))]
    async fn process(&self, request: &PaymentRequest) -> Result<PaymentReceipt, PaymentError> {
        tokio::time::sleep(self.delay).await;
        info!(amount = %request.amount, "Simulated payment approved");
        Ok(PaymentReceipt {
            reference: format!("SIM-{}", request.order_id),
            processed_at: Utc::now(),
        })
    }
}
