//! Furniture Estimator Storefront library.
//!
//! The customer side of the estimator: a persisted cart, the checkout
//! wizard and a client for the furniture catalog API. Front ends (the CLI,
//! or any UI) hold one [`CartStore`] and inject it where it is needed.
//!
//! # Modules
//!
//! - [`storage`] - Key/value persistence for the cart
//! - [`cart`] - Cart Store with change notifications
//! - [`checkout`] - Checkout Flow and the payment seam
//! - [`catalog`] - Furniture Catalog API client
//! - [`config`] - Environment configuration

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod storage;

pub use cart::{CartError, CartEvent, CartStore};
pub use catalog::{CatalogClient, CatalogError, cart_item_from};
pub use checkout::{CheckoutError, CheckoutFlow, CheckoutStep, OrderConfirmation};
pub use config::{ConfigError, StorefrontConfig};
pub use storage::{FileStore, LocalStore, MemoryStore, StorageError};
