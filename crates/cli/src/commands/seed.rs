//! Seed the catalog with sample furniture.
//!
//! Reads entries from a YAML file (or the built-in samples), validates them,
//! and writes them straight into the catalog API's data file. By default the
//! entries are appended; `--replace` starts the catalog over.

use std::path::{Path, PathBuf};

use estimator_admin::AdminConfig;
use estimator_admin::db::FurnitureRepository;
use estimator_core::{NewFurniture, Price};
use tracing::{info, warn};

use super::CommandError;

/// Built-in sample catalog.
const SAMPLE_FURNITURE: &str = include_str!("../../seed/furniture.yaml");

/// Seed furniture into the catalog file.
///
/// # Arguments
///
/// * `file` - YAML file to read instead of the built-in samples
/// * `data_file` - Catalog file to write instead of `ADMIN_DATA_FILE`
/// * `replace` - Replace the catalog instead of appending
///
/// # Errors
///
/// Returns an error if the YAML is invalid, an entry fails validation, or
/// the catalog cannot be written.
pub async fn furniture(
    file: Option<&Path>,
    data_file: Option<PathBuf>,
    replace: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let content = match file {
        Some(path) => {
            info!(path = %path.display(), "Loading furniture from file");
            tokio::fs::read_to_string(path).await?
        }
        None => SAMPLE_FURNITURE.to_string(),
    };
    let entries = parse_entries(&content)?;
    info!(entries = entries.len(), "Parsed seed data");

    let data_file = match data_file {
        Some(path) => path,
        None => AdminConfig::from_env()?.data_file,
    };
    let repo = FurnitureRepository::new(data_file);

    if replace {
        let existing = repo.list(None).await?.len();
        if existing > 0 {
            warn!(existing, "Replacing existing catalog");
        }
        repo.replace_all(&[]).await?;
    }

    let created = repo.extend(entries).await?;
    let total = repo.list(None).await?.len();

    info!("Seeding complete!");
    info!("  File: {}", repo.path().display());
    info!("  Added: {}", created.len());
    info!("  Catalog size: {total}");
    for (index, item) in created.iter().enumerate() {
        info!("  {}. {} - {}", index + 1, item.name, Price::inr(item.price));
    }

    Ok(())
}

/// Parse and validate seed entries.
fn parse_entries(content: &str) -> Result<Vec<NewFurniture>, Box<dyn std::error::Error>> {
    let entries: Vec<NewFurniture> = serde_yaml::from_str(content)?;
    for (index, entry) in entries.iter().enumerate() {
        entry.validate().map_err(|e| CommandError::InvalidSeed {
            index: index + 1,
            name: entry.name.clone(),
            reason: e.to_string(),
        })?;
    }
    Ok(entries)
}
