//! Furniture catalog API handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;
use tracing::instrument;

use estimator_core::{FurnitureId, FurnitureItem, FurnitureStatus, NewFurniture};

use crate::{error::AppError, state::AppState};

/// Build the furniture router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/furniture", get(list_furniture).post(create_furniture))
        .route(
            "/api/furniture/{id}",
            get(get_furniture).delete(delete_furniture),
        )
}

/// Query parameters for the listing.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub status: Option<FurnitureStatus>,
}

/// List catalog entries.
///
/// # Errors
///
/// Returns `AppError::Database` if the catalog cannot be read.
#[instrument(skip(state))]
pub async fn list_furniture(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<FurnitureItem>>, AppError> {
    let items = state.furniture().list(query.status).await?;
    Ok(Json(items))
}

/// Create a catalog entry.
///
/// # Errors
///
/// Returns `AppError::BadRequest` for a malformed body or missing required
/// fields, `AppError::Database` if the catalog cannot be written.
#[instrument(skip(state, body))]
pub async fn create_furniture(
    State(state): State<AppState>,
    body: Result<Json<NewFurniture>, JsonRejection>,
) -> Result<(StatusCode, Json<FurnitureItem>), AppError> {
    let Json(new) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;
    new.validate()?;

    let created = state.furniture().create(new).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Get a catalog entry.
///
/// # Errors
///
/// Returns `AppError::NotFound` if no entry has this id.
#[instrument(skip(state))]
pub async fn get_furniture(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<FurnitureItem>, AppError> {
    let id = parse_id(&id)?;
    state
        .furniture()
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("furniture {id}")))
}

/// Delete a catalog entry.
///
/// # Errors
///
/// Returns `AppError::NotFound` if no entry has this id.
#[instrument(skip(state))]
pub async fn delete_furniture(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id)?;
    if state.furniture().delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("furniture {id}")))
    }
}

fn parse_id(raw: &str) -> Result<FurnitureId, AppError> {
    raw.parse()
        .map_err(|_| AppError::BadRequest(format!("invalid furniture id: {raw}")))
}
