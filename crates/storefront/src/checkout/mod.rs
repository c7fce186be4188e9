//! Checkout Flow: the Details → Payment → Success wizard.
//!
//! ```text
//!            open            submit_details        submit_payment
//!   Closed ───────► Details ───────────────► Payment ─────────────► Processing ──► Success
//!     ▲                ▲                      │  │                      │            │
//!     │                └──────── back ────────┘  │◄──── processor error ┘            │
//!     └──────────────────────── close (from any state) ──────────────────────────────┘
//! ```
//!
//! Closing keeps whatever the customer typed, except from `Success`, where
//! every field is reset for the next order.

pub mod payment;

use std::fmt;

use chrono::{DateTime, Utc};
use estimator_core::{
    CartItem, CartState, CustomerDetails, FormError, OrderId, OrderTotals, PaymentDetails,
    PaymentMethod, compute_totals,
};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, instrument, warn};

pub use payment::{
    PaymentError, PaymentProcessor, PaymentReceipt, PaymentRequest, SimulatedPayment,
};

use crate::cart::CartStore;
use crate::storage::LocalStore;

/// Where the wizard currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutStep {
    #[default]
    Closed,
    Details,
    Payment,
    Processing,
    Success,
}

impl fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Closed => "closed",
            Self::Details => "details",
            Self::Payment => "payment",
            Self::Processing => "processing",
            Self::Success => "success",
        };
        f.write_str(name)
    }
}

/// Errors returned by checkout actions. The wizard state is unchanged
/// unless stated otherwise.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("cannot {action} while checkout is {from}")]
    InvalidTransition {
        from: CheckoutStep,
        action: &'static str,
    },

    #[error(transparent)]
    Invalid(#[from] FormError),

    #[error("cannot check out an empty cart")]
    EmptyCart,

    /// The processor failed; the wizard is back in `Payment`.
    #[error(transparent)]
    Payment(#[from] PaymentError),
}

/// What the customer sees after a successful order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderConfirmation {
    pub order_id: OrderId,
    /// Cart contents captured before the cart was cleared.
    pub items: Vec<CartItem>,
    pub totals: OrderTotals,
    pub customer: CustomerDetails,
    pub payment_method: PaymentMethod,
    pub payment_reference: String,
    pub placed_at: DateTime<Utc>,
}

/// The checkout wizard for one customer session.
pub struct CheckoutFlow<P> {
    processor: P,
    tax_rate: Decimal,
    step: CheckoutStep,
    cart: CartState,
    customer: CustomerDetails,
    method: PaymentMethod,
    payment: PaymentDetails,
    confirmation: Option<OrderConfirmation>,
}

impl<P: PaymentProcessor> CheckoutFlow<P> {
    #[must_use]
    pub fn new(processor: P, tax_rate: Decimal) -> Self {
        Self {
            processor,
            tax_rate,
            step: CheckoutStep::Closed,
            cart: CartState::new(),
            customer: CustomerDetails::default(),
            method: PaymentMethod::default(),
            payment: PaymentDetails::default(),
            confirmation: None,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[must_use]
    pub const fn step(&self) -> CheckoutStep {
        self.step
    }

    /// Cart view captured when the wizard was opened.
    #[must_use]
    pub const fn cart(&self) -> &CartState {
        &self.cart
    }

    /// Order summary for the captured cart view.
    #[must_use]
    pub fn totals(&self) -> OrderTotals {
        compute_totals(&self.cart, self.tax_rate)
    }

    #[must_use]
    pub const fn customer(&self) -> &CustomerDetails {
        &self.customer
    }

    #[must_use]
    pub const fn payment_method(&self) -> PaymentMethod {
        self.method
    }

    #[must_use]
    pub const fn payment(&self) -> &PaymentDetails {
        &self.payment
    }

    /// Set once the wizard reaches `Success`.
    #[must_use]
    pub const fn confirmation(&self) -> Option<&OrderConfirmation> {
        self.confirmation.as_ref()
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Open the wizard on the details step.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless the wizard is closed.
    pub fn open<S: LocalStore>(&mut self, cart: &CartStore<S>) -> Result<(), CheckoutError> {
        self.expect_step(CheckoutStep::Closed, "open")?;
        self.cart = cart.get();
        self.step = CheckoutStep::Details;
        Ok(())
    }

    /// Replace the shipping and contact fields.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` outside the details step.
    pub fn update_details(&mut self, details: CustomerDetails) -> Result<(), CheckoutError> {
        self.expect_step(CheckoutStep::Details, "edit details")?;
        self.customer = details;
        Ok(())
    }

    /// Move to the payment step if every detail field is filled in.
    ///
    /// # Errors
    ///
    /// Returns `Invalid` naming the first bad field, or `InvalidTransition`
    /// outside the details step.
    pub fn submit_details(&mut self) -> Result<(), CheckoutError> {
        self.expect_step(CheckoutStep::Details, "submit details")?;
        self.customer.validate()?;
        self.step = CheckoutStep::Payment;
        Ok(())
    }

    /// Return from payment to details. Nothing entered is lost.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` outside the payment step.
    pub fn back(&mut self) -> Result<(), CheckoutError> {
        self.expect_step(CheckoutStep::Payment, "go back")?;
        self.step = CheckoutStep::Details;
        Ok(())
    }

    /// Choose how to pay.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` outside the payment step.
    pub fn select_payment_method(&mut self, method: PaymentMethod) -> Result<(), CheckoutError> {
        self.expect_step(CheckoutStep::Payment, "select a payment method")?;
        self.method = method;
        Ok(())
    }

    /// Replace the payment fields.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` outside the payment step.
    pub fn update_payment(&mut self, payment: PaymentDetails) -> Result<(), CheckoutError> {
        self.expect_step(CheckoutStep::Payment, "edit payment")?;
        self.payment = payment;
        Ok(())
    }

    /// Charge the customer, clear the cart and show the confirmation.
    ///
    /// The wizard is in `Processing` while the processor runs. On failure it
    /// returns to `Payment` with the cart untouched.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` outside the payment step, `Invalid` for
    /// missing method fields, `EmptyCart` when there is nothing to buy, or
    /// `Payment` when the processor fails.
    #[instrument(skip(self, cart), fields(method = %self.method))]
    pub async fn submit_payment<S: LocalStore>(
        &mut self,
        cart: &CartStore<S>,
    ) -> Result<&OrderConfirmation, CheckoutError> {
        self.expect_step(CheckoutStep::Payment, "submit payment")?;
        self.payment.validate(self.method)?;

        let snapshot = cart.get();
        if snapshot.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let totals = compute_totals(&snapshot, self.tax_rate);
        let placed_at = Utc::now();
        let request = PaymentRequest {
            order_id: OrderId::from_timestamp(placed_at),
            method: self.method,
            amount: totals.total,
        };

        let processing = ProcessingGuard::enter(&mut self.step);
        let receipt = match self.processor.process(&request).await {
            Ok(receipt) => receipt,
            Err(e) => {
                warn!(order_id = %request.order_id, error = %e, "Payment failed");
                return Err(e.into());
            }
        };

        if let Err(e) = cart.clear() {
            error!(order_id = %request.order_id, error = %e, "Order placed but cart could not be cleared");
        }

        info!(
            order_id = %request.order_id,
            total = %totals.total,
            items = snapshot.total_items(),
            "Order placed"
        );

        self.cart = CartState::new();
        processing.complete();
        let confirmation = self.confirmation.insert(OrderConfirmation {
            order_id: request.order_id,
            items: snapshot.items().to_vec(),
            totals,
            customer: self.customer.clone(),
            payment_method: self.method,
            payment_reference: receipt.reference,
            placed_at,
        });
        Ok(confirmation)
    }

    /// Close the wizard. From `Success` every field is reset.
    pub fn close(&mut self) {
        if self.step == CheckoutStep::Success {
            self.customer = CustomerDetails::default();
            self.method = PaymentMethod::default();
            self.payment = PaymentDetails::default();
            self.confirmation = None;
        }
        self.step = CheckoutStep::Closed;
    }

    fn expect_step(&self, expected: CheckoutStep, action: &'static str) -> Result<(), CheckoutError> {
        if self.step == expected {
            Ok(())
        } else {
            Err(CheckoutError::InvalidTransition {
                from: self.step,
                action,
            })
        }
    }
}

/// Holds the wizard in `Processing` while the processor runs. Dropped
/// without `complete` (failure, or the caller dropping the future), it puts
/// the wizard back on `Payment`.
struct ProcessingGuard<'a> {
    step: &'a mut CheckoutStep,
}

impl<'a> ProcessingGuard<'a> {
    fn enter(step: &'a mut CheckoutStep) -> Self {
        *step = CheckoutStep::Processing;
        Self { step }
    }

    fn complete(self) {
        *self.step = CheckoutStep::Success;
    }
}

impl Drop for ProcessingGuard<'_> {
    fn drop(&mut self) {
        if *self.step == CheckoutStep::Processing {
            *self.step = CheckoutStep::Payment;
        }
    }
}
