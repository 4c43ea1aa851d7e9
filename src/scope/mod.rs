//! Ownership scope resolution.
//!
//! Codex records carry no owner column of their own: they are reachable
//! through a parent series, through linked books, or both. Every read and
//! write therefore resolves the record through the caller's ownership
//! graph before anything else happens. One resolver serves all codex
//! kinds; storage details live behind the gateway traits.

use uuid::Uuid;

use crate::database::gateway::{OwnedGateway, ScopedGateway};
use crate::database::manager::StoreError;
use crate::error::ApiError;

/// Which parents the caller says the record hangs under. Scoped lookups
/// require at least one; the resolver checks what the caller names against
/// what the caller owns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScopeHints {
    pub series_id: Option<Uuid>,
    pub book_id: Option<Uuid>,
}

impl ScopeHints {
    pub fn series(id: Uuid) -> Self {
        Self {
            series_id: Some(id),
            book_id: None,
        }
    }

    pub fn book(id: Uuid) -> Self {
        Self {
            series_id: None,
            book_id: Some(id),
        }
    }

    pub fn none(&self) -> bool {
        self.series_id.is_none() && self.book_id.is_none()
    }
}

/// Outcome of a scoped lookup. A value, not an error: handlers match on it
/// and always produce a deterministic response.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<T> {
    /// The record exists and is reachable through at least one hinted
    /// parent the caller owns.
    Found(T),
    /// Nothing reachable. Deliberately covers both "not yours" and "does
    /// not exist" so responses cannot be used to probe for record ids.
    Forbidden,
    /// The caller named no parent at all; no lookup was attempted.
    ScopeMissing,
}

impl<T> Resolution<T> {
    /// Translate into the API outcome table: 400 for a missing scope, the
    /// uniform 403 for anything unreachable.
    pub fn require(self) -> Result<T, ApiError> {
        match self {
            Resolution::Found(record) => Ok(record),
            Resolution::Forbidden => Err(ApiError::ownership_denied()),
            Resolution::ScopeMissing => Err(ApiError::scope_missing()),
        }
    }
}

/// Resolve one codex record through the caller's ownership graph.
///
/// Each hint produces an independent, ownership-filtered candidate lookup
/// and the candidates are OR-merged: any hit wins over any miss. When both
/// hints hit, the book-scoped candidate takes precedence because it is
/// evaluated last. Both candidates address the same storage row, so they
/// only differ if the row changed between the two reads; the revision
/// check at save time catches that race.
pub async fn resolve<G: ScopedGateway>(
    gateway: &G,
    id: Uuid,
    principal: Uuid,
    hints: ScopeHints,
    with_relations: bool,
) -> Result<Resolution<G::Record>, StoreError> {
    if hints.none() {
        return Ok(Resolution::ScopeMissing);
    }

    let mut candidate = None;

    if let Some(series) = hints.series_id {
        if let Some(record) = gateway
            .get_for_principal_and_series(id, principal, series, with_relations)
            .await?
        {
            candidate = Some(record);
        }
    }

    if let Some(book) = hints.book_id {
        if let Some(record) = gateway
            .get_for_principal_and_book(id, principal, book, with_relations)
            .await?
        {
            candidate = Some(record);
        }
    }

    Ok(match candidate {
        Some(record) => Resolution::Found(record),
        None => Resolution::Forbidden,
    })
}

/// Degenerate single-path form for records owned directly (series and
/// books). There is no hint to omit, so the only outcomes are Found and
/// Forbidden.
pub async fn resolve_owned<G: OwnedGateway>(
    gateway: &G,
    id: Uuid,
    principal: Uuid,
) -> Result<Resolution<G::Record>, StoreError> {
    Ok(match gateway.get_for_principal(id, principal).await? {
        Some(record) => Resolution::Found(record),
        None => Resolution::Forbidden,
    })
}

/// Parents a new codex record will attach to.
#[derive(Debug, Clone, PartialEq)]
pub struct Parents<S, B> {
    pub series: Option<S>,
    pub book: Option<B>,
}

/// Mirror of [`resolve`] for creation: fetch the hinted parents through
/// the caller's ownership instead of the record itself. Returns None when
/// no hinted parent resolves - the caller owns nothing the record could
/// attach to, so it must not be created at all.
pub async fn resolve_parents<GS, GB>(
    series_gateway: &GS,
    book_gateway: &GB,
    principal: Uuid,
    hints: ScopeHints,
) -> Result<Option<Parents<GS::Record, GB::Record>>, StoreError>
where
    GS: OwnedGateway,
    GB: OwnedGateway,
{
    let mut series = None;
    let mut book = None;

    if let Some(id) = hints.series_id {
        series = series_gateway.get_for_principal(id, principal).await?;
    }
    if let Some(id) = hints.book_id {
        book = book_gateway.get_for_principal(id, principal).await?;
    }

    if series.is_none() && book.is_none() {
        return Ok(None);
    }

    Ok(Some(Parents { series, book }))
}
