//! Furniture Estimator Core - Shared types library.
//!
//! This crate provides common types used across all estimator components:
//! - `storefront` - Customer-side cart, checkout and catalog client
//! - `admin` - The flat-file furniture catalog API
//! - `cli` - Command-line front end
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! HTTP clients, no storage. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Catalog entries, cart lines, checkout forms, ids and prices
//! - [`pricing`] - Subtotal, GST and total computation

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod pricing;
pub mod types;

pub use pricing::{GST_RATE, OrderTotals, compute_totals};
pub use types::*;
