// CRUD for /api/codex/:kind - worldbuilding records reached through the
// caller's series and books rather than owned directly. One handler set
// serves every kind; the path segment picks the table.

use axum::extract::{Path, Query};
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::database::kind::CodexKind;
use crate::database::manager::Database;
use crate::database::models::{CodexEntry, CodexPatch, CodexView, NewCodexEntry};
use crate::database::{BookStore, CodexStore, ScopedGateway, SeriesStore};
use crate::error::ApiError;
use crate::middleware::auth::Principal;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::scope::{self, ScopeHints};

/// Parent hints as they arrive on the query string.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeQuery {
    pub series_id: Option<String>,
    pub book_id: Option<String>,
}

impl ScopeQuery {
    fn hints(&self) -> Result<ScopeHints, ApiError> {
        Ok(ScopeHints {
            series_id: self.series_id.as_deref().map(super::parse_id).transpose()?,
            book_id: self.book_id.as_deref().map(super::parse_id).transpose()?,
        })
    }
}

fn kind_for(slug: &str) -> Result<&'static CodexKind, ApiError> {
    CodexKind::from_slug(slug)
        .ok_or_else(|| ApiError::not_found(format!("no such codex kind: {}", slug)))
}

async fn store_for(kind: &'static CodexKind) -> Result<CodexStore, ApiError> {
    Ok(CodexStore::new(kind, Database::pool().await?.clone()))
}

/// GET /api/codex/:kind - list entries reachable by the caller. Without
/// hints this spans all their series and books; a hint narrows the list to
/// one parent, and two hints return the union of both.
pub async fn codex_list(
    Extension(principal): Extension<Principal>,
    Path(kind): Path<String>,
    Query(query): Query<ScopeQuery>,
) -> ApiResult<Vec<CodexView>> {
    let kind = kind_for(&kind)?;
    let hints = query.hints()?;
    let store = store_for(kind).await?;

    let entries = match (hints.series_id, hints.book_id) {
        (None, None) => store.list_for_principal(principal.id).await?,
        (Some(series), None) => {
            store
                .list_for_principal_and_series(principal.id, series)
                .await?
        }
        (None, Some(book)) => store.list_for_principal_and_book(principal.id, book).await?,
        (Some(series), Some(book)) => {
            let mut entries = store
                .list_for_principal_and_series(principal.id, series)
                .await?;
            let from_book = store.list_for_principal_and_book(principal.id, book).await?;
            for view in from_book {
                if !entries.iter().any(|seen| seen.entry.id == view.entry.id) {
                    entries.push(view);
                }
            }
            entries
        }
    };

    Ok(ApiResponse::success(entries))
}

/// POST /api/codex/:kind - at least one parent hint must resolve to a
/// series or book the caller owns, or nothing is written.
pub async fn codex_create(
    Extension(principal): Extension<Principal>,
    Path(kind): Path<String>,
    Json(draft): Json<NewCodexEntry>,
) -> ApiResult<CodexEntry> {
    let kind = kind_for(&kind)?;
    if draft.name.trim().is_empty() {
        return Err(ApiError::bad_request("name is required"));
    }

    let pool = Database::pool().await?.clone();
    let hints = ScopeHints {
        series_id: draft.series_id,
        book_id: draft.book_id,
    };

    let series_store = SeriesStore::new(pool.clone());
    let book_store = BookStore::new(pool.clone());
    let Some(parents) =
        scope::resolve_parents(&series_store, &book_store, principal.id, hints).await?
    else {
        return Err(ApiError::bad_request(format!(
            "a new {} must belong to one of your series or books",
            kind.label
        )));
    };

    let entry = CodexStore::new(kind, pool)
        .create(
            &draft,
            parents.series.map(|s| s.id),
            parents.book.map(|b| b.id),
        )
        .await?;

    Ok(ApiResponse::created(entry))
}

/// GET /api/codex/:kind/:id - resolve through the hinted parents, relations
/// attached on success.
pub async fn codex_get(
    Extension(principal): Extension<Principal>,
    Path((kind, id)): Path<(String, String)>,
    Query(query): Query<ScopeQuery>,
) -> ApiResult<CodexView> {
    let kind = kind_for(&kind)?;
    let id = super::parse_id(&id)?;
    let hints = query.hints()?;
    let store = store_for(kind).await?;

    let view = scope::resolve(&store, id, principal.id, hints, true)
        .await?
        .require()?;
    Ok(ApiResponse::success(view))
}

/// PATCH /api/codex/:kind/:id - the resolve doubles as the authorization
/// check and the data fetch; the save is a compare-and-swap on the fetched
/// revision.
pub async fn codex_update(
    Extension(principal): Extension<Principal>,
    Path((kind, id)): Path<(String, String)>,
    Query(query): Query<ScopeQuery>,
    Json(patch): Json<CodexPatch>,
) -> ApiResult<CodexEntry> {
    let kind = kind_for(&kind)?;
    let id = super::parse_id(&id)?;
    let hints = query.hints()?;
    let store = store_for(kind).await?;

    let current = scope::resolve(&store, id, principal.id, hints, false)
        .await?
        .require()?;
    let merged = patch.apply_to(&current.entry);

    let saved = super::saved_or_conflict(store.save(&merged).await?)?;
    Ok(ApiResponse::success(saved))
}

/// DELETE /api/codex/:kind/:id
pub async fn codex_delete(
    Extension(principal): Extension<Principal>,
    Path((kind, id)): Path<(String, String)>,
    Query(query): Query<ScopeQuery>,
) -> ApiResult<Value> {
    let kind = kind_for(&kind)?;
    let id = super::parse_id(&id)?;
    let hints = query.hints()?;
    let store = store_for(kind).await?;

    scope::resolve(&store, id, principal.id, hints, false)
        .await?
        .require()?;
    store.delete(id).await?;

    Ok(ApiResponse::success(json!({ "deleted": true, "id": id })))
}
