//! Order totals.
//!
//! Tax is the only derived amount that can carry a fraction. It is rounded
//! half-up to two decimal places (paise); subtotal and shipping are whole
//! rupees, so the total is exact.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::CartState;

/// Goods and Services Tax rate applied to furniture orders (18%).
pub const GST_RATE: Decimal = Decimal::from_parts(18, 0, 0, false, 2);

/// Flat shipping charge; shipping is free.
pub const SHIPPING: Decimal = Decimal::ZERO;

/// Breakdown of an order's cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTotals {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
}

impl OrderTotals {
    /// Compute totals from a subtotal.
    #[must_use]
    pub fn from_subtotal(subtotal: Decimal, tax_rate: Decimal) -> Self {
        let tax = (subtotal * tax_rate).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        Self {
            subtotal,
            tax,
            shipping: SHIPPING,
            total: subtotal + tax + SHIPPING,
        }
    }
}

/// Compute the totals for a cart at the given tax rate.
#[must_use]
pub fn compute_totals(cart: &CartState, tax_rate: Decimal) -> OrderTotals {
    OrderTotals::from_subtotal(Decimal::from(cart.total_amount()), tax_rate)
}
