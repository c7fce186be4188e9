//! CLI command implementations.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod seed;

use estimator_storefront::{CartStore, CatalogClient, FileStore, StorefrontConfig};
use thiserror::Error;

/// Errors specific to CLI commands.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Quantity must be at least one when adding.
    #[error("quantity must be at least 1")]
    ZeroQuantity,

    /// A cart line id that is not in the cart.
    #[error("no cart line with id {0}")]
    NotInCart(String),

    /// A seed entry failed validation.
    #[error("seed entry {index} ({name}): {reason}")]
    InvalidSeed {
        index: usize,
        name: String,
        reason: String,
    },
}

/// Load the storefront configuration.
fn config() -> Result<StorefrontConfig, Box<dyn std::error::Error>> {
    Ok(StorefrontConfig::from_env()?)
}

/// Open the persisted cart under the configured data directory.
fn open_cart(config: &StorefrontConfig) -> Result<CartStore<FileStore>, Box<dyn std::error::Error>> {
    let storage = FileStore::open(&config.data_dir)?;
    Ok(CartStore::open(storage))
}

/// Catalog client for the configured API.
fn catalog_client(config: &StorefrontConfig) -> CatalogClient {
    CatalogClient::new(config.catalog_url.clone())
}
