//! HTTP client for the catalog API.

use std::sync::Arc;
use std::time::Duration;

use estimator_core::{FurnitureId, FurnitureItem, FurnitureStatus, NewFurniture};
use moka::future::Cache;
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

use super::CatalogError;

const LISTING_KEY: &str = "furniture:all";
const LISTING_TTL: Duration = Duration::from_secs(60);

// =============================================================================
// CatalogClient
// =============================================================================

/// Client for the Furniture Catalog API.
///
/// Cheap to clone; clones share the connection pool and cache.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: Url,
    cache: Cache<&'static str, Arc<Vec<FurnitureItem>>>,
}

impl CatalogClient {
    /// Create a client for the API rooted at `base_url`.
    ///
    /// The base is treated as a directory: `https://shop.example/catalog`
    /// serves `https://shop.example/catalog/api/furniture`.
    #[must_use]
    pub fn new(mut base_url: Url) -> Self {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let cache = Cache::builder()
            .max_capacity(16)
            .time_to_live(LISTING_TTL)
            .build();

        Self {
            inner: Arc::new(CatalogClientInner {
                client: reqwest::Client::new(),
                base_url,
                cache,
            }),
        }
    }

    /// The API root this client talks to.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Every catalog entry, in the order the API returns them.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a list of
    /// furniture entries.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<FurnitureItem>, CatalogError> {
        if let Some(items) = self.inner.cache.get(LISTING_KEY).await {
            debug!("Cache hit for furniture listing");
            return Ok(items.as_ref().clone());
        }

        let url = self.collection_url()?;
        let body = self.send(self.inner.client.get(url), "furniture listing").await?;
        let items: Vec<FurnitureItem> = parse(&body)?;
        debug!(count = items.len(), "Fetched furniture listing");

        self.inner
            .cache
            .insert(LISTING_KEY, Arc::new(items.clone()))
            .await;

        Ok(items)
    }

    /// Entries customers may order.
    ///
    /// # Errors
    ///
    /// See [`Self::list`].
    pub async fn active(&self) -> Result<Vec<FurnitureItem>, CatalogError> {
        let mut items = self.list().await?;
        items.retain(|item| item.status == FurnitureStatus::Active);
        Ok(items)
    }

    /// A single entry.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if no entry has this id.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn get(&self, id: FurnitureId) -> Result<FurnitureItem, CatalogError> {
        let url = self.item_url(id)?;
        let body = self
            .send(self.inner.client.get(url), &format!("furniture {id}"))
            .await?;
        parse(&body)
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Create an entry; the API assigns the id and timestamps.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Status` if the API rejects the entry.
    #[instrument(skip(self, new), fields(name = %new.name))]
    pub async fn create(&self, new: &NewFurniture) -> Result<FurnitureItem, CatalogError> {
        let url = self.collection_url()?;
        let body = self
            .send(self.inner.client.post(url).json(new), "furniture listing")
            .await?;
        let created: FurnitureItem = parse(&body)?;

        self.inner.cache.invalidate(LISTING_KEY).await;
        info!(id = %created.id, "Created furniture entry");
        Ok(created)
    }

    /// Delete an entry.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if no entry has this id.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn delete(&self, id: FurnitureId) -> Result<(), CatalogError> {
        let url = self.item_url(id)?;
        self.send(self.inner.client.delete(url), &format!("furniture {id}"))
            .await?;

        self.inner.cache.invalidate(LISTING_KEY).await;
        info!("Deleted furniture entry");
        Ok(())
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn collection_url(&self) -> Result<Url, CatalogError> {
        Ok(self.inner.base_url.join("api/furniture")?)
    }

    fn item_url(&self, id: FurnitureId) -> Result<Url, CatalogError> {
        Ok(self.inner.base_url.join(&format!("api/furniture/{id}"))?)
    }

    /// Send a request and return the body of a successful response.
    async fn send(&self, request: RequestBuilder, what: &str) -> Result<String, CatalogError> {
        let response = request.send().await?;
        let status = response.status();

        // Body as text first for better error diagnostics
        let body = response.text().await?;

        if status == StatusCode::NOT_FOUND {
            warn!(status = %status, what, "Catalog API has no such resource");
            return Err(CatalogError::NotFound(what.to_string()));
        }

        if !status.is_success() {
            error!(
                status = %status,
                body = %excerpt(&body, 500),
                "Catalog API returned non-success status"
            );
            return Err(CatalogError::Status {
                status: status.as_u16(),
                body: excerpt(&body, 200),
            });
        }

        Ok(body)
    }
}

fn parse<T: DeserializeOwned>(body: &str) -> Result<T, CatalogError> {
    serde_json::from_str(body).map_err(|e| {
        error!(
            error = %e,
            body = %excerpt(body, 500),
            "Failed to parse catalog API response"
        );
        CatalogError::Parse(e)
    })
}

fn excerpt(body: &str, max_chars: usize) -> String {
    body.chars().take(max_chars).collect()
}
