//! Core types for the furniture estimator.
//!
//! This module provides type-safe wrappers for the catalog, cart and
//! checkout domain.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod dimensions;
pub mod email;
pub mod form;
pub mod id;
pub mod price;
pub mod status;

pub use cart::{CartItem, CartItemError, CartState, FurnitureConfig};
pub use catalog::{FurnitureItem, Model3d, NewFurniture};
pub use checkout::{CustomerDetails, PaymentDetails, PaymentMethod, UnknownPaymentMethod};
pub use dimensions::Dimensions;
pub use email::{Email, EmailError};
pub use form::FormError;
pub use id::{CartItemId, FurnitureId, OrderId};
pub use price::{CurrencyCode, Price};
pub use status::FurnitureStatus;
