//! Furniture Catalog API client.
//!
//! # Architecture
//!
//! - The catalog API is the source of truth; nothing is synced locally
//! - The full listing is cached in memory via `moka` (60 second TTL) and
//!   dropped whenever this client creates or deletes an entry
//! - Entries whose `dimensions` or `model3d` arrive as JSON-encoded strings
//!   are normalized while deserializing, so callers only see typed values
//! - No retries: a failed request is reported to the caller
//!
//! # Example
//!
//! ```rust,ignore
//! use estimator_storefront::catalog::{CatalogClient, cart_item_from};
//!
//! let client = CatalogClient::new(config.catalog_url.clone());
//! let sofa = client.get(id).await?;
//! cart.add(cart_item_from(&sofa, NonZeroU32::MIN)?)?;
//! ```

mod client;
mod conversions;

pub use client::CatalogClient;
pub use conversions::cart_item_from;

use thiserror::Error;

/// Errors that can occur when talking to the catalog API.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("catalog API returned {status}: {body}")]
    Status { status: u16, body: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The endpoint URL could not be built.
    #[error("invalid catalog URL: {0}")]
    Url(#[from] url::ParseError),
}
