//! Cart commands.
//!
//! The cart lives in `STOREFRONT_DATA_DIR` (default: `.estimator`) and
//! survives between invocations.

use std::num::NonZeroU32;

use estimator_core::{CartItemId, CartState, FurnitureId, OrderTotals, Price, compute_totals};
use estimator_storefront::cart_item_from;
use rust_decimal::Decimal;
use tracing::info;

use super::{CommandError, catalog_client, config, open_cart};

/// Print the cart with its order summary.
///
/// # Errors
///
/// Returns an error if the configuration or data directory is unusable.
pub fn show() -> Result<(), Box<dyn std::error::Error>> {
    let config = config()?;
    let cart = open_cart(&config)?.get();
    print_cart(&cart, &compute_totals(&cart, config.tax_rate), config.tax_rate);
    Ok(())
}

/// Add `quantity` units of a catalog entry.
///
/// # Errors
///
/// Returns an error if the entry cannot be fetched or the cart cannot be saved.
pub async fn add(furniture_id: FurnitureId, quantity: u32) -> Result<(), Box<dyn std::error::Error>> {
    let quantity = NonZeroU32::new(quantity).ok_or(CommandError::ZeroQuantity)?;
    let config = config()?;
    let store = open_cart(&config)?;

    let entry = catalog_client(&config).get(furniture_id).await?;
    let cart = store.add(cart_item_from(&entry, quantity)?)?;
    info!(
        item = %entry.name,
        total_items = cart.total_items(),
        total = %Price::inr(cart.total_amount()),
        "Added to cart"
    );
    Ok(())
}

/// Set a line's quantity; zero or less removes the line.
///
/// # Errors
///
/// Returns an error if the line is not in the cart or the cart cannot be saved.
pub fn set(item_id: &str, quantity: i64) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_cart(&config()?)?;
    let id = existing_line(&store.get(), item_id)?;
    let cart = store.update_quantity(&id, quantity)?;
    info!(total_items = cart.total_items(), "Cart updated");
    Ok(())
}

/// Remove a line.
///
/// # Errors
///
/// Returns an error if the line is not in the cart or the cart cannot be saved.
pub fn remove(item_id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_cart(&config()?)?;
    let id = existing_line(&store.get(), item_id)?;
    let cart = store.remove(&id)?;
    info!(total_items = cart.total_items(), "Removed from cart");
    Ok(())
}

/// Empty the cart.
///
/// # Errors
///
/// Returns an error if the cart cannot be saved.
pub fn clear() -> Result<(), Box<dyn std::error::Error>> {
    open_cart(&config()?)?.clear()?;
    info!("Cart cleared");
    Ok(())
}

fn existing_line(cart: &CartState, item_id: &str) -> Result<CartItemId, CommandError> {
    let id = CartItemId::from(item_id);
    if cart.get(&id).is_some() {
        Ok(id)
    } else {
        Err(CommandError::NotInCart(item_id.to_string()))
    }
}

/// Print cart lines followed by subtotal, GST, shipping and total.
#[allow(clippy::print_stdout)]
pub fn print_cart(cart: &CartState, totals: &OrderTotals, tax_rate: Decimal) {
    if cart.is_empty() {
        println!("Your cart is empty");
        return;
    }

    for item in cart.items() {
        let config = item.config();
        println!("{}  x{}", item.name(), item.quantity());
        println!(
            "  {} · {} · {} · {} / {}",
            config.category, config.material, config.dimensions, config.finish, config.color
        );
        println!(
            "  {} each  {}",
            Price::inr(item.unit_price()),
            Price::inr(item.total_price())
        );
        println!("  id: {}", item.id());
    }

    print_totals(cart.total_items(), totals, tax_rate);
}

#[allow(clippy::print_stdout)]
pub fn print_totals(total_items: u64, totals: &OrderTotals, tax_rate: Decimal) {
    let percent = (tax_rate * Decimal::ONE_HUNDRED).normalize();
    println!();
    println!("Subtotal ({total_items} items): {}", Price::inr(totals.subtotal));
    println!("GST ({percent}%): {}", Price::inr(totals.tax));
    if totals.shipping.is_zero() {
        println!("Shipping: Free");
    } else {
        println!("Shipping: {}", Price::inr(totals.shipping));
    }
    println!("Total: {}", Price::inr(totals.total));
}
