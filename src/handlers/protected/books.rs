// CRUD for /api/books - records owned directly by the caller, optionally
// grouped under one of their series

use axum::extract::{Path, Query};
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::database::manager::Database;
use crate::database::models::{Book, BookPatch, BookView, NewBook};
use crate::database::{BookStore, OwnedGateway, SeriesStore};
use crate::error::ApiError;
use crate::middleware::auth::Principal;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::scope;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookListQuery {
    pub series_id: Option<String>,
}

async fn store() -> Result<BookStore, ApiError> {
    Ok(BookStore::new(Database::pool().await?.clone()))
}

/// GET /api/books - every book the caller owns, or just one series' worth
/// when ?seriesId= narrows the list
pub async fn book_list(
    Extension(principal): Extension<Principal>,
    Query(query): Query<BookListQuery>,
) -> ApiResult<Vec<Book>> {
    let store = store().await?;

    let books = match query.series_id.as_deref() {
        Some(raw) => {
            let series = super::parse_id(raw)?;
            store
                .list_for_principal_in_series(principal.id, series)
                .await?
        }
        None => store.list_for_principal(principal.id).await?,
    };

    Ok(ApiResponse::success(books))
}

/// POST /api/books - the series link is optional, but when given it must
/// name a series the caller owns
pub async fn book_create(
    Extension(principal): Extension<Principal>,
    Json(draft): Json<NewBook>,
) -> ApiResult<Book> {
    if draft.title.trim().is_empty() {
        return Err(ApiError::bad_request("title is required"));
    }

    let pool = Database::pool().await?.clone();

    let series = match draft.series_id {
        Some(series_id) => {
            let series_store = SeriesStore::new(pool.clone());
            let owned = series_store
                .get_for_principal(series_id, principal.id)
                .await?;
            if owned.is_none() {
                return Err(ApiError::bad_request(
                    "seriesId does not name one of your series",
                ));
            }
            Some(series_id)
        }
        None => None,
    };

    let book = BookStore::new(pool).create(principal.id, &draft, series).await?;
    Ok(ApiResponse::created(book))
}

/// GET /api/books/:id - one book with its series reference attached
pub async fn book_get(
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> ApiResult<BookView> {
    let id = super::parse_id(&id)?;
    let store = store().await?;

    let view = store
        .get_with_series(id, principal.id)
        .await?
        .ok_or_else(ApiError::ownership_denied)?;
    Ok(ApiResponse::success(view))
}

/// PATCH /api/books/:id - shallow merge, then compare-and-swap save
pub async fn book_update(
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
    Json(patch): Json<BookPatch>,
) -> ApiResult<Book> {
    let id = super::parse_id(&id)?;
    let store = store().await?;

    let current = scope::resolve_owned(&store, id, principal.id)
        .await?
        .require()?;
    let merged = patch.apply_to(&current);

    let saved = super::saved_or_conflict(store.save(&merged).await?)?;
    Ok(ApiResponse::success(saved))
}

/// DELETE /api/books/:id - codex entries attached to the book lose that
/// attachment; entries attached nowhere else become unreachable
pub async fn book_delete(
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
