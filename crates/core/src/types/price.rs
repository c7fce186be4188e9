//! Prices and locale-aware money formatting.
//!
//! Catalog prices are whole rupees. Computed amounts (tax, totals) may
//! carry paise, so everything is carried as [`Decimal`].

use core::fmt;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A monetary amount with its currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (rupees, not paise).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a rupee price.
    #[must_use]
    pub fn inr(amount: impl Into<Decimal>) -> Self {
        Self::new(amount.into(), CurrencyCode::INR)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self
            .amount
            .abs()
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let whole = rounded.trunc().normalize().to_string();
        let paise = (rounded.fract() * Decimal::ONE_HUNDRED)
            .to_u32()
            .unwrap_or(0);

        let (first, rest) = self.currency_code.grouping();
        let sign = if self.amount.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };

        write!(
            f,
            "{sign}{}{}",
            self.currency_code.symbol(),
            group_digits(&whole, first, rest)
        )?;
        if paise != 0 {
            write!(f, ".{paise:02}")?;
        }
        Ok(())
    }
}

/// Insert thousands separators: the first group has `first` digits, every
/// following group `rest` digits.
fn group_digits(digits: &str, first: usize, rest: usize) -> String {
    let mut reversed = Vec::with_capacity(digits.len() + digits.len() / 2);
    for (i, c) in digits.chars().rev().enumerate() {
        if i == first || (i > first && (i - first) % rest == 0) {
            reversed.push(',');
        }
        reversed.push(c);
    }
    reversed.into_iter().rev().collect()
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    INR,
    USD,
    EUR,
    GBP,
}

impl CurrencyCode {
    /// Display symbol.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::INR => "₹",
            Self::USD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }

    /// Digit grouping (first group, subsequent groups). Rupees use the
    /// lakh/crore system.
    const fn grouping(self) -> (usize, usize) {
        match self {
            Self::INR => (3, 2),
            Self::USD | Self::EUR | Self::GBP => (3, 3),
        }
    }
}
