//! Shopping cart lines and cart state.
//!
//! Totals are never stored independently: a line's total is always
//! `unit_price × quantity` and the cart's counters are always sums over its
//! lines. The persisted form carries the totals for readability, but they
//! are recomputed on load.
//!
//! Every amount must fit in a `u64` of rupees and every quantity in a `u32`.
//! Operations that would exceed either are rejected with a
//! [`CartItemError`] and leave the cart unchanged.

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::{CartItemId, Dimensions};

/// The attributes that distinguish one cart line from another.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FurnitureConfig {
    pub category: String,
    pub material: String,
    pub dimensions: Dimensions,
    pub finish: String,
    pub color: String,
}

impl FurnitureConfig {
    /// Derive the cart identity, e.g. `table-oak-72x30x36-natural-natural`.
    #[must_use]
    pub fn id(&self) -> CartItemId {
        let raw = format!(
            "{}-{}-{}-{}-{}",
            self.category.trim(),
            self.material.trim(),
            self.dimensions.compact(),
            self.finish.trim(),
            self.color.trim()
        );
        CartItemId::new(raw.to_lowercase().replace(char::is_whitespace, "_"))
    }
}

/// One purchasable line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CartItemRecord", into = "CartItemRecord")]
pub struct CartItem {
    id: CartItemId,
    name: String,
    config: FurnitureConfig,
    quantity: u32,
    unit_price: u64,
}

impl CartItem {
    /// Create a cart line. The identity is derived from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`CartItemError::AmountOverflow`] if the line total does not
    /// fit in a `u64`.
    pub fn new(
        name: impl Into<String>,
        config: FurnitureConfig,
        unit_price: u64,
        quantity: NonZeroU32,
    ) -> Result<Self, CartItemError> {
        let id = config.id();
        if line_total(unit_price, quantity.get()).is_none() {
            return Err(CartItemError::AmountOverflow(id.to_string()));
        }
        Ok(Self {
            id,
            name: name.into(),
            config,
            quantity: quantity.get(),
            unit_price,
        })
    }

    #[must_use]
    pub const fn id(&self) -> &CartItemId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn config(&self) -> &FurnitureConfig {
        &self.config
    }

    /// Number of units; always at least one.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Price of a single unit in whole rupees.
    #[must_use]
    pub const fn unit_price(&self) -> u64 {
        self.unit_price
    }

    /// `unit_price × quantity`.
    #[must_use]
    pub fn total_price(&self) -> u64 {
        // Checked whenever quantity or price is set.
        self.unit_price * u64::from(self.quantity)
    }
}

fn line_total(unit_price: u64, quantity: u32) -> Option<u64> {
    unit_price.checked_mul(u64::from(quantity))
}

/// Error produced when a persisted cart line violates the line invariants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CartItemError {
    #[error("cart line {0} has zero quantity")]
    ZeroQuantity(String),

    #[error("cart line {0}: quantity is too large")]
    QuantityOverflow(String),

    #[error("cart line {0}: amount is too large")]
    AmountOverflow(String),
}

/// Persisted layout of a cart line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CartItemRecord {
    #[serde(default)]
    id: String,
    #[serde(default)]
    name: String,
    category: String,
    material: String,
    dimensions: Dimensions,
    finish: String,
    color: String,
    quantity: u32,
    unit_price: u64,
    #[serde(default)]
    total_price: u64,
}

impl TryFrom<CartItemRecord> for CartItem {
    type Error = CartItemError;

    fn try_from(record: CartItemRecord) -> Result<Self, Self::Error> {
        let quantity =
            NonZeroU32::new(record.quantity).ok_or(CartItemError::ZeroQuantity(record.id))?;
        let config = FurnitureConfig {
            category: record.category,
            material: record.material,
            dimensions: record.dimensions,
            finish: record.finish,
            color: record.color,
        };
        Self::new(record.name, config, record.unit_price, quantity)
    }
}

impl From<CartItem> for CartItemRecord {
    fn from(item: CartItem) -> Self {
        let total_price = item.total_price();
        Self {
            id: item.id.to_string(),
            name: item.name,
            category: item.config.category,
            material: item.config.material,
            dimensions: item.config.dimensions,
            finish: item.config.finish,
            color: item.config.color,
            quantity: item.quantity,
            unit_price: item.unit_price,
            total_price,
        }
    }
}

/// The full shopping cart: lines in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "CartStateRecord", into = "CartStateRecord")]
pub struct CartState {
    items: Vec<CartItem>,
}

impl CartState {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up a line by identity.
    #[must_use]
    pub fn get(&self, id: &CartItemId) -> Option<&CartItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Sum of quantities over all lines.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Sum of line totals, in whole rupees.
    #[must_use]
    pub fn total_amount(&self) -> u64 {
        // Checked on every mutation.
        self.items.iter().map(CartItem::total_price).sum()
    }

    /// Append a line, or merge it into the existing line with the same
    /// identity. A merge adds the quantities and keeps the existing unit price.
    ///
    /// # Errors
    ///
    /// Returns [`CartItemError::QuantityOverflow`] or
    /// [`CartItemError::AmountOverflow`] if the merged line or the cart total
    /// would not fit; the cart is left unchanged.
    pub fn add(&mut self, item: CartItem) -> Result<(), CartItemError> {
        let position = self.items.iter().position(|line| line.id == item.id);
        let (line_amount, replaced) = match position.and_then(|i| self.items.get(i)) {
            Some(existing) => {
                let quantity = existing
                    .quantity
                    .checked_add(item.quantity)
                    .ok_or_else(|| CartItemError::QuantityOverflow(item.id.to_string()))?;
                let amount = line_total(existing.unit_price, quantity)
                    .ok_or_else(|| CartItemError::AmountOverflow(item.id.to_string()))?;
                (amount, existing.total_price())
            }
            None => (item.total_price(), 0),
        };
        self.check_amount(&item.id, replaced, line_amount)?;

        match position.and_then(|i| self.items.get_mut(i)) {
            Some(existing) => existing.quantity += item.quantity,
            None => self.items.push(item),
        }
        Ok(())
    }

    /// Remove the line with `id`. Returns `false` if there was none.
    pub fn remove(&mut self, id: &CartItemId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| &item.id != id);
        self.items.len() != before
    }

    /// Set the quantity of the line with `id`; zero or less removes it.
    /// Returns `false` if there was no such line.
    ///
    /// # Errors
    ///
    /// Returns [`CartItemError::QuantityOverflow`] for a quantity above
    /// `u32::MAX`, or [`CartItemError::AmountOverflow`] if the line or cart
    /// total would not fit; the cart is left unchanged.
    pub fn update_quantity(
        &mut self,
        id: &CartItemId,
        quantity: i64,
    ) -> Result<bool, CartItemError> {
        if quantity <= 0 {
            return Ok(self.remove(id));
        }
        let Some(line) = self.get(id) else {
            return Ok(false);
        };
        let quantity = u32::try_from(quantity)
            .map_err(|_| CartItemError::QuantityOverflow(id.to_string()))?;
        let amount = line_total(line.unit_price, quantity)
            .ok_or_else(|| CartItemError::AmountOverflow(id.to_string()))?;
        self.check_amount(id, line.total_price(), amount)?;

        if let Some(line) = self.items.iter_mut().find(|item| &item.id == id) {
            line.quantity = quantity;
        }
        Ok(true)
    }

    /// Drop every line.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Check that swapping a line total of `replaced` for `amount` keeps the
    /// cart total within `u64`.
    fn check_amount(
        &self,
        id: &CartItemId,
        replaced: u64,
        amount: u64,
    ) -> Result<(), CartItemError> {
        (self.total_amount() - replaced)
            .checked_add(amount)
            .map(|_| ())
            .ok_or_else(|| CartItemError::AmountOverflow(id.to_string()))
    }
}

/// Persisted layout of the cart. Totals are written out but ignored on read.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CartStateRecord {
    #[serde(default)]
    items: Vec<CartItem>,
    #[serde(default)]
    total_items: u64,
    #[serde(default)]
    total_amount: u64,
}

impl TryFrom<CartStateRecord> for CartState {
    type Error = CartItemError;

    fn try_from(record: CartStateRecord) -> Result<Self, Self::Error> {
        let mut state = Self::new();
        for item in record.items {
            state.add(item)?;
        }
        Ok(state)
    }
}

impl From<CartState> for CartStateRecord {
    fn from(state: CartState) -> Self {
        Self {
            total_items: state.total_items(),
            total_amount: state.total_amount(),
            items: state.items,
        }
    }
}
