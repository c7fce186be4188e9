//! Integration tests for the furniture estimator.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p estimator-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `catalog_api` - Catalog client against an in-process catalog API
//! - `cart_checkout` - Cart Store and Checkout Flow end to end
//!
//! No external services are needed: each test starts the catalog API on an
//! ephemeral port with its own temporary data file.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;
use std::path::PathBuf;

use estimator_admin::{AdminConfig, AppState, app};
use estimator_storefront::CatalogClient;
use tempfile::TempDir;
use url::Url;

/// A running catalog API backed by a temporary data file.
pub struct TestCatalog {
    pub addr: SocketAddr,
    pub data_file: PathBuf,
    _dir: TempDir,
}

impl TestCatalog {
    /// Start the catalog API on `127.0.0.1:0`.
    ///
    /// # Panics
    ///
    /// Panics if the temp dir or listener cannot be created.
    #[allow(clippy::unwrap_used)]
    pub async fn start() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let data_file = dir.path().join("furniture.json");

        let file = data_file.display().to_string();
        let config = AdminConfig::from_lookup(|key| match key {
            "ADMIN_PORT" => Some("0".to_string()),
            "ADMIN_DATA_FILE" => Some(file.clone()),
            _ => None,
        })
        .unwrap();

        let listener = tokio::net::TcpListener::bind(config.socket_addr())
            .await
            .unwrap();
        let addr = listener.local_addr().unwrap();
        let router = app(AppState::new(config));
        tokio::spawn(async move {
            axum::serve(listener, router).await.ok();
        });

        Self {
            addr,
            data_file,
            _dir: dir,
        }
    }

    /// Base URL of the running API.
    ///
    /// # Panics
    ///
    /// Panics if the address does not form a URL.
    #[allow(clippy::unwrap_used)]
    #[must_use]
    pub fn url(&self) -> Url {
        Url::parse(&format!("http://{}", self.addr)).unwrap()
    }

    /// A fresh client (with its own cache) for this API.
    #[must_use]
    pub fn client(&self) -> CatalogClient {
        CatalogClient::new(self.url())
    }
}
