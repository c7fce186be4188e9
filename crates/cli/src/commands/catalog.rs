//! Catalog commands.
//!
//! # Usage
//!
//! ```bash
//! estimator catalog list --status Active
//! estimator catalog show 0d5b3f7e-8c1a-4f65-9a57-0c2f3e1b9d44
//! estimator catalog add --file sofa.json
//! estimator catalog delete 0d5b3f7e-8c1a-4f65-9a57-0c2f3e1b9d44
//! ```
//!
//! # Environment Variables
//!
//! - `CATALOG_URL` - Base URL of the catalog API (default: `http://127.0.0.1:3001`)

use std::path::Path;

use estimator_core::{FurnitureId, FurnitureItem, FurnitureStatus, NewFurniture, Price};
use tracing::info;

use super::{catalog_client, config};

/// List catalog entries, optionally only those with `status`.
///
/// # Errors
///
/// Returns an error if the catalog API cannot be reached.
#[allow(clippy::print_stdout)]
pub async fn list(status: Option<FurnitureStatus>) -> Result<(), Box<dyn std::error::Error>> {
    let client = catalog_client(&config()?);
    let mut items = client.list().await?;
    if let Some(status) = status {
        items.retain(|item| item.status == status);
    }

    if items.is_empty() {
        info!("No furniture found");
        return Ok(());
    }

    for item in &items {
        println!(
            "{}  {:<28} {:>12}  {:<8} stock {}",
            item.id,
            item.name,
            Price::inr(item.price).to_string(),
            item.status,
            item.stock
        );
    }
    Ok(())
}

/// Show one catalog entry in full.
///
/// # Errors
///
/// Returns an error if the entry does not exist or the API cannot be reached.
pub async fn show(id: FurnitureId) -> Result<(), Box<dyn std::error::Error>> {
    let client = catalog_client(&config()?);
    let item = client.get(id).await?;
    print_item(&item);
    Ok(())
}

/// Create a catalog entry from a JSON file.
///
/// # Errors
///
/// Returns an error if the file is unreadable or invalid, or the API rejects
/// the entry.
pub async fn add(file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let content = tokio::fs::read_to_string(file).await?;
    let new: NewFurniture = serde_json::from_str(&content)?;
    new.validate()?;

    let client = catalog_client(&config()?);
    let created = client.create(&new).await?;
    info!(id = %created.id, "Furniture added");
    print_item(&created);
    Ok(())
}

/// Delete a catalog entry.
///
/// # Errors
///
/// Returns an error if the entry does not exist or the API cannot be reached.
pub async fn delete(id: FurnitureId) -> Result<(), Box<dyn std::error::Error>> {
    let client = catalog_client(&config()?);
    client.delete(id).await?;
    info!(%id, "Furniture deleted");
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_item(item: &FurnitureItem) {
    println!("{}", item.name);
    println!("  id:          {}", item.id);
    println!("  category:    {}", item.category);
    println!("  material:    {}", item.material);
    println!("  dimensions:  {} ({})", item.dimensions, item.dimensions.compact());
    println!("  finish:      {}", item.finish);
    println!("  color:       {}", item.color);
    println!("  price:       {}", Price::inr(item.price));
    println!("  stock:       {}", item.stock);
    println!("  status:      {}", item.status);
    if let Some(glb) = item.model3d.as_ref().and_then(|m| m.glb.as_deref()) {
        println!("  3D model:    {glb}");
    }
    if !item.description.is_empty() {
        println!("  {}", item.description);
    }
}
