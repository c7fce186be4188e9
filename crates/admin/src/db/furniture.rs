//! Furniture repository over the flat JSON catalog file.
//!
//! Every operation reads the file, and every write replaces it atomically
//! (temp file + rename). A `tokio::sync::Mutex` serializes access so that
//! concurrent requests never interleave a read-modify-write.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use estimator_core::{FurnitureId, FurnitureItem, FurnitureStatus, NewFurniture};

use super::RepositoryError;

// =============================================================================
// Repository
// =============================================================================

/// Repository for catalog entries. Clones share the same file lock.
#[derive(Clone)]
pub struct FurnitureRepository {
    inner: Arc<FurnitureRepositoryInner>,
}

struct FurnitureRepositoryInner {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FurnitureRepository {
    /// Create a repository backed by `path`. The file need not exist yet.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            inner: Arc::new(FurnitureRepositoryInner {
                path: path.into(),
                lock: Mutex::new(()),
            }),
        }
    }

    /// Path of the catalog file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// Check that the catalog can be read.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the file is unreadable or corrupted.
    pub async fn check(&self) -> Result<(), RepositoryError> {
        let _guard = self.inner.lock.lock().await;
        self.read_all().await.map(|_| ())
    }

    /// List entries in file order, optionally only those with `status`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Io` if the file cannot be read.
    /// Returns `RepositoryError::DataCorruption` if the file is not a catalog.
    #[instrument(skip(self))]
    pub async fn list(
        &self,
        status: Option<FurnitureStatus>,
    ) -> Result<Vec<FurnitureItem>, RepositoryError> {
        let _guard = self.inner.lock.lock().await;
        let mut items = self.read_all().await?;
        if let Some(status) = status {
            items.retain(|item| item.status == status);
        }
        debug!(count = items.len(), "Listed furniture");
        Ok(items)
    }

    /// Get an entry by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Io` if the file cannot be read.
    /// Returns `RepositoryError::DataCorruption` if the file is not a catalog.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn get(&self, id: FurnitureId) -> Result<Option<FurnitureItem>, RepositoryError> {
        let _guard = self.inner.lock.lock().await;
        let items = self.read_all().await?;
        Ok(items.into_iter().find(|item| item.id == id))
    }

    /// Append a new entry with a fresh id and timestamps.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the catalog cannot be read or written.
    #[instrument(skip(self, new), fields(name = %new.name))]
    pub async fn create(&self, new: NewFurniture) -> Result<FurnitureItem, RepositoryError> {
        let mut created = self.extend(vec![new]).await?;
        created.pop().ok_or_else(|| {
            RepositoryError::DataCorruption("created entry missing after write".to_string())
        })
    }

    /// Append several new entries in one write.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the catalog cannot be read or written.
    pub async fn extend(
        &self,
        new: Vec<NewFurniture>,
    ) -> Result<Vec<FurnitureItem>, RepositoryError> {
        let _guard = self.inner.lock.lock().await;
        let mut items = self.read_all().await?;

        let now = Utc::now();
        let created: Vec<FurnitureItem> = new
            .into_iter()
            .map(|entry| FurnitureItem::from_new(entry, FurnitureId::generate(), now))
            .collect();
        items.extend(created.iter().cloned());

        self.write_all(&items).await?;
        info!(added = created.len(), total = items.len(), "Added furniture");
        Ok(created)
    }

    /// Delete an entry. Returns whether it existed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the catalog cannot be read or written.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn delete(&self, id: FurnitureId) -> Result<bool, RepositoryError> {
        let _guard = self.inner.lock.lock().await;
        let mut items = self.read_all().await?;
        let before = items.len();
        items.retain(|item| item.id != id);
        if items.len() == before {
            return Ok(false);
        }

        self.write_all(&items).await?;
        info!("Deleted furniture");
        Ok(true)
    }

    /// Replace the whole catalog.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the catalog cannot be written.
    pub async fn replace_all(&self, items: &[FurnitureItem]) -> Result<(), RepositoryError> {
        let _guard = self.inner.lock.lock().await;
        self.write_all(items).await?;
        info!(total = items.len(), "Replaced catalog");
        Ok(())
    }

    // =========================================================================
    // File access (callers hold the lock)
    // =========================================================================

    async fn read_all(&self) -> Result<Vec<FurnitureItem>, RepositoryError> {
        let raw = match tokio::fs::read_to_string(&self.inner.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.io_error(e)),
        };

        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&raw).map_err(|e| {
            RepositoryError::DataCorruption(format!(
                "{} is not a furniture catalog: {e}",
                self.inner.path.display()
            ))
        })
    }

    async fn write_all(&self, items: &[FurnitureItem]) -> Result<(), RepositoryError> {
        let path = &self.inner.path;
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(e))?;
        }

        let json = serde_json::to_vec_pretty(items)?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| self.io_error(e))?;
        tokio::fs::rename(&tmp, path)
            .await
            .map_err(|e| self.io_error(e))
    }

    fn io_error(&self, source: std::io::Error) -> RepositoryError {
        RepositoryError::Io {
            path: self.inner.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use estimator_core::Dimensions;

    use super::*;

    fn chair(name: &str, status: FurnitureStatus) -> NewFurniture {
        NewFurniture {
            name: name.to_owned(),
            category: "chair".to_owned(),
            material: "walnut".to_owned(),
            dimensions: Dimensions::new(24, 36, 24),
            finish: "stained".to_owned(),
            color: "brown".to_owned(),
            price: 18_000,
            stock: 15,
            status,
            ..NewFurniture::default()
        }
    }

    fn repo() -> (tempfile::TempDir, FurnitureRepository) {
        let dir = tempfile::tempdir().unwrap();
        let repo = FurnitureRepository::new(dir.path().join("data").join("furniture.json"));
        (dir, repo)
    }

    #[tokio::test]
    async fn test_missing_file_is_empty_catalog() {
        let (_dir, repo) = repo();
        assert!(repo.list(None).await.unwrap().is_empty());
        assert!(repo.check().await.is_ok());
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_timestamps() {
        let (_dir, repo) = repo();
        let created = repo
            .create(chair("Walnut Chair", FurnitureStatus::Active))
            .await
            .unwrap();

        assert_eq!(created.created_at, created.updated_at);
        let fetched = repo.get(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);

        let raw = std::fs::read_to_string(repo.path()).unwrap();
        assert!(raw.contains("\"created_at\""));
        assert!(raw.contains("\"width\": 24"));
    }

    #[tokio::test]
    async fn test_list_filters_by_status() {
        let (_dir, repo) = repo();
        repo.extend(vec![
            chair("A", FurnitureStatus::Active),
            chair("B", FurnitureStatus::Draft),
            chair("C", FurnitureStatus::Active),
        ])
        .await
        .unwrap();

        let all = repo.list(None).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[1].name, "B");

        let active = repo.list(Some(FurnitureStatus::Active)).await.unwrap();
        let names: Vec<_> = active.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["A", "C"]);
    }

    #[tokio::test]
    async fn test_delete_reports_existence() {
        let (_dir, repo) = repo();
        let created = repo.create(chair("A", FurnitureStatus::Active)).await.unwrap();

        assert!(repo.delete(created.id).await.unwrap());
        assert!(!repo.delete(created.id).await.unwrap());
        assert!(repo.get(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_string_encoded_rows_are_normalized() {
        let (_dir, repo) = repo();
        std::fs::create_dir_all(repo.path().parent().unwrap()).unwrap();
        std::fs::write(
            repo.path(),
            r#"[{
                "id": "6f1c2d0a-3b4e-4c5d-8e9f-0a1b2c3d4e5f",
                "name": "Pine Wood Bookshelf",
                "category": "bookshelf",
                "material": "pine",
                "dimensions": "{\"width\":48,\"height\":72,\"depth\":12}",
                "price": 28000,
                "status": "Active",
                "model3d": "not json",
                "created_at": "2024-03-01T09:30:00Z",
                "updated_at": "2024-03-01T09:30:00Z"
            }]"#,
        )
        .unwrap();

        let items = repo.list(None).await.unwrap();
        assert_eq!(items[0].dimensions, Dimensions::new(48, 72, 12));
        assert!(items[0].model3d.is_none());
    }

    #[tokio::test]
    async fn test_corrupted_file_is_reported() {
        let (_dir, repo) = repo();
        std::fs::create_dir_all(repo.path().parent().unwrap()).unwrap();
        std::fs::write(repo.path(), "{ nope").unwrap();

        assert!(matches!(
            repo.list(None).await,
            Err(RepositoryError::DataCorruption(_))
        ));
        assert!(repo.check().await.is_err());
    }

    #[tokio::test]
    async fn test_concurrent_creates_are_not_lost() {
        let (_dir, repo) = repo();
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let repo = repo.clone();
                tokio::spawn(async move {
                    repo.create(chair(&format!("Chair {i}"), FurnitureStatus::Active))
                        .await
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(repo.list(None).await.unwrap().len(), 8);
    }

    #[tokio::test]
    async fn test_replace_all_overwrites() {
        let (_dir, repo) = repo();
        repo.create(chair("Old", FurnitureStatus::Active)).await.unwrap();

        let fresh = FurnitureItem::from_new(
            chair("New", FurnitureStatus::Active),
            FurnitureId::generate(),
            Utc::now(),
        );
        repo.replace_all(std::slice::from_ref(&fresh)).await.unwrap();

        assert_eq!(repo.list(None).await.unwrap(), vec![fresh]);
    }
}
