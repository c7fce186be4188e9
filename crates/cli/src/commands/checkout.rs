//! Checkout command: runs the wizard non-interactively.

use estimator_core::{CustomerDetails, PaymentDetails, PaymentMethod};
use estimator_storefront::checkout::{CheckoutFlow, OrderConfirmation, SimulatedPayment};
use rust_decimal::Decimal;
use tracing::info;

use super::cart::print_totals;
use super::{config, open_cart};

/// Everything the wizard asks for.
pub struct CheckoutInput {
    pub customer: CustomerDetails,
    pub method: PaymentMethod,
    pub payment: PaymentDetails,
}

/// Place an order for the current cart.
///
/// # Errors
///
/// Returns an error for missing fields, an empty cart, or a failed payment.
pub async fn run(input: CheckoutInput) -> Result<(), Box<dyn std::error::Error>> {
    let config = config()?;
    let store = open_cart(&config)?;
    let mut flow = CheckoutFlow::new(SimulatedPayment::new(config.payment_delay), config.tax_rate);

    flow.open(&store)?;
    flow.update_details(input.customer)?;
    flow.submit_details()?;
    flow.select_payment_method(input.method)?;
    flow.update_payment(input.payment)?;

    info!(
        method = %input.method,
        total = %flow.totals().total,
        "Processing payment"
    );
    let confirmation = flow.submit_payment(&store).await?;
    print_confirmation(confirmation, config.tax_rate);

    flow.close();
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_confirmation(order: &OrderConfirmation, tax_rate: Decimal) {
    println!("Order placed successfully!");
    println!("Order ID: #{}", order.order_id);
    println!("Payment: {} ({})", order.payment_method, order.payment_reference);
    println!();
    for item in &order.items {
        println!("{} x{}", item.name(), item.quantity());
    }

    let total_items = order.items.iter().map(|i| u64::from(i.quantity())).sum();
    print_totals(total_items, &order.totals, tax_rate);

    let customer = &order.customer;
    println!();
    println!("Delivering to {}", customer.name);
    println!("  {}", customer.address);
    println!("  {}, {} {}", customer.city, customer.state, customer.pincode);
    println!("Confirmation sent to {}", customer.email);
}
