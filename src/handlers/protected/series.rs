// CRUD for /api/series - records owned directly by the caller

use axum::extract::Path;
use axum::{Extension, Json};
use serde_json::{json, Value};

use crate::database::manager::Database;
use crate::database::models::{NewSeries, Series, SeriesPatch, SeriesView};
use crate::database::SeriesStore;
use crate::error::ApiError;
use crate::middleware::auth::Principal;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::scope;

async fn store() -> Result<SeriesStore, ApiError> {
    Ok(SeriesStore::new(Database::pool().await?.clone()))
}

/// GET /api/series - every series the caller owns
pub async fn series_list(Extension(principal): Extension<Principal>) -> ApiResult<Vec<Series>> {
    let store = store().await?;
    let series = store.list_for_principal(principal.id).await?;
    Ok(ApiResponse::success(series))
}

/// POST /api/series
pub async fn series_create(
    Extension(principal): Extension<Principal>,
    Json(draft): Json<NewSeries>,
) -> ApiResult<Series> {
    if draft.title.trim().is_empty() {
        return Err(ApiError::bad_request("title is required"));
    }

    let store = store().await?;
    let series = store.create(principal.id, draft).await?;
    Ok(ApiResponse::created(series))
}

/// GET /api/series/:id - one series with its books attached
pub async fn series_get(
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> ApiResult<SeriesView> {
    let id = super::parse_id(&id)?;
    let store = store().await?;

    let view = store
        .get_with_books(id, principal.id)
        .await?
        .ok_or_else(ApiError::ownership_denied)?;
    Ok(ApiResponse::success(view))
}

/// PATCH /api/series/:id - shallow merge, then compare-and-swap save
pub async fn series_update(
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
    Json(patch): Json<SeriesPatch>,
) -> ApiResult<Series> {
    let id = super::parse_id(&id)?;
    let store = store().await?;

    let current = scope::resolve_owned(&store, id, principal.id)
        .await?
        .require()?;
    let merged = patch.apply_to(&current);

    let saved = super::saved_or_conflict(store.save(&merged).await?)?;
    Ok(ApiResponse::success(saved))
}

/// DELETE /api/series/:id - books survive but lose their series link
pub async fn series_delete(
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    let id = super::parse_id(&id)?;
    let store = store().await?;

    scope::resolve_owned(&store, id, principal.id)
        .await?
        .require()?;
    store.delete(id).await?;

    Ok(ApiResponse::success(json!({ "deleted": true, "id": id })))
}
