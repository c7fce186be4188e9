//! Conversions from catalog entries to cart lines.

use std::num::NonZeroU32;

use estimator_core::{CartItem, CartItemError, FurnitureItem};

/// Build the cart line for `quantity` units of a catalog entry.
///
/// # Errors
///
/// Returns [`CartItemError::AmountOverflow`] if the line total does not fit.
pub fn cart_item_from(
    item: &FurnitureItem,
    quantity: NonZeroU32,
) -> Result<CartItem, CartItemError> {
    CartItem::new(item.name.clone(), item.config(), item.price, quantity)
}
