//! Integration tests for the catalog client against a live catalog API.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use estimator_core::{Dimensions, FurnitureId, FurnitureStatus, Model3d, NewFurniture};
use estimator_integration_tests::TestCatalog;
use estimator_storefront::CatalogError;

fn sofa() -> NewFurniture {
    NewFurniture {
        name: "Luxury Teak Sofa".to_owned(),
        category: "sofa".to_owned(),
        material: "teak".to_owned(),
        dimensions: Dimensions::new(84, 36, 36),
        finish: "lacquered".to_owned(),
        color: "natural".to_owned(),
        price: 125_000,
        stock: 5,
        status: FurnitureStatus::Active,
        model3d: Some(Model3d {
            glb: Some("/placeholder-model.glb".to_owned()),
            usdz: None,
        }),
        ..NewFurniture::default()
    }
}

// =============================================================================
// CRUD
// =============================================================================

#[tokio::test]
async fn test_create_then_get_and_list() {
    let catalog = TestCatalog::start().await;
    let client = catalog.client();

    let created = client.create(&sofa()).await.unwrap();
    assert_eq!(created.name, "Luxury Teak Sofa");
    assert_eq!(created.dimensions, Dimensions::new(84, 36, 36));

    let fetched = client.get(created.id).await.unwrap();
    assert_eq!(fetched, created);

    let listed = client.list().await.unwrap();
    assert_eq!(listed, vec![created]);
}

#[tokio::test]
async fn test_delete_then_get_is_not_found() {
    let catalog = TestCatalog::start().await;
    let client = catalog.client();

    let created = client.create(&sofa()).await.unwrap();
    client.delete(created.id).await.unwrap();

    assert!(matches!(
        client.get(created.id).await,
        Err(CatalogError::NotFound(_))
    ));
    assert!(matches!(
        client.delete(created.id).await,
        Err(CatalogError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_invalid_entry_is_rejected_with_status() {
    let catalog = TestCatalog::start().await;
    let client = catalog.client();

    let mut nameless = sofa();
    nameless.name = String::new();

    match client.create(&nameless).await {
        Err(CatalogError::Status { status, body }) => {
            assert_eq!(status, 400);
            assert!(body.contains("name is required"));
        }
        other => panic!("expected a 400, got {other:?}"),
    }
}

#[tokio::test]
async fn test_active_filters_out_drafts() {
    let catalog = TestCatalog::start().await;
    let client = catalog.client();

    let mut draft = sofa();
    draft.name = "Prototype Sofa".to_owned();
    draft.status = FurnitureStatus::Draft;
    client.create(&sofa()).await.unwrap();
    client.create(&draft).await.unwrap();

    let active = client.active().await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].name, "Luxury Teak Sofa");
}

// =============================================================================
// Caching
// =============================================================================

#[tokio::test]
async fn test_listing_is_cached_until_client_writes() {
    let catalog = TestCatalog::start().await;
    let client = catalog.client();
    let other = catalog.client();

    assert!(client.list().await.unwrap().is_empty());

    // A write through another client is not visible until the cache expires
    other.create(&sofa()).await.unwrap();
    assert!(client.list().await.unwrap().is_empty());

    // A write through this client drops the cached listing
    let created = client.create(&sofa()).await.unwrap();
    assert_eq!(client.list().await.unwrap().len(), 2);

    client.delete(created.id).await.unwrap();
    assert_eq!(client.list().await.unwrap().len(), 1);
}

// =============================================================================
// Payload normalization
// =============================================================================

#[tokio::test]
async fn test_string_encoded_rows_reach_client_as_objects() {
    let catalog = TestCatalog::start().await;
    let id = FurnitureId::generate();
    std::fs::write(
        &catalog.data_file,
        format!(
            r#"[{{
                "id": "{id}",
                "name": "Mahogany King Bed",
                "category": "bed",
                "material": "mahogany",
                "dimensions": "{{\"width\":76,\"height\":48,\"depth\":80}}",
                "finish": "stained",
                "color": "cherry",
                "price": 95000,
                "stock": 6,
                "status": "Active",
                "images": [],
                "description": "",
                "model3d": "{{\"glb\":\"/models/bed.glb\"}}",
                "created_at": "2024-02-10T08:00:00Z",
                "updated_at": "2024-02-10T08:00:00Z"
            }}]"#
        ),
    )
    .unwrap();

    let bed = catalog.client().get(id).await.unwrap();
    assert_eq!(bed.dimensions, Dimensions::new(76, 48, 80));
    assert_eq!(
        bed.model3d.and_then(|m| m.glb),
        Some("/models/bed.glb".to_owned())
    );
}

#[tokio::test]
async fn test_unparseable_nested_fields_fall_back() {
    let catalog = TestCatalog::start().await;
    let id = FurnitureId::generate();
    std::fs::write(
        &catalog.data_file,
        format!(
            r#"[{{
                "id": "{id}",
                "name": "Odd Stool",
                "category": "stool",
                "material": "pine",
                "dimensions": "garbage",
                "model3d": "{{broken",
                "created_at": "2024-02-10T08:00:00Z",
                "updated_at": "2024-02-10T08:00:00Z"
            }}]"#
        ),
    )
    .unwrap();

    let items = catalog.client().list().await.unwrap();
    assert_eq!(items[0].dimensions, Dimensions::default());
    assert!(items[0].model3d.is_none());
}

#[tokio::test]
async fn test_corrupted_catalog_is_server_error() {
    let catalog = TestCatalog::start().await;
    std::fs::write(&catalog.data_file, "not a catalog").unwrap();

    assert!(matches!(
        catalog.client().list().await,
        Err(CatalogError::Status { status: 500, .. })
    ));

    let ready = reqwest::get(catalog.url().join("health/ready").unwrap())
        .await
        .unwrap();
    assert_eq!(ready.status(), reqwest::StatusCode::SERVICE_UNAVAILABLE);
}
