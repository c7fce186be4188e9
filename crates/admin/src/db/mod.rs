//! Catalog persistence.
//!
//! # Storage: flat JSON file
//!
//! The catalog is a single JSON array of furniture rows (snake_case fields,
//! `created_at`/`updated_at` timestamps). A missing file is an empty catalog.
//! Rows written by older tools may hold `dimensions` and `model3d` as
//! JSON-encoded strings; they are normalized on read and written back as
//! objects on the next write.
//!
//! # Seeding
//!
//! ```bash
//! cargo run -p estimator-cli -- seed
//! ```

pub mod furniture;

use std::path::PathBuf;

use thiserror::Error;

pub use furniture::FurnitureRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Reading or writing the catalog file failed.
    #[error("catalog file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Data in the catalog file is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// The catalog could not be serialized.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
