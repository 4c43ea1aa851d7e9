// Protected handlers: every route here runs behind the session middleware
// and receives the caller as a `Principal` request extension.
// Route prefix: /api/*
pub mod auth; // account introspection and deletion
pub mod books;
pub mod codex;
pub mod series;

use uuid::Uuid;

use crate::error::ApiError;

/// Path and query ids arrive as strings so a bad value answers with the
/// JSON error envelope instead of axum's plain-text rejection.
pub(crate) fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::bad_request("invalid id: expected a UUID"))
}

/// Saves are compare-and-swap on the fetched revision; an empty result
/// means the row moved between our fetch and our write. Every update
/// handler reports that the same way.
pub(crate) fn saved_or_conflict<T>(saved: Option<T>) -> Result<T, ApiError> {
    saved.ok_or_else(|| ApiError::conflict("the record changed while you were editing it"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id_accepts_canonical_uuid() {
        assert!(parse_id("550e8400-e29b-41d4-a716-446655440000").is_ok());
    }

    #[test]
    fn test_parse_id_rejects_junk() {
        let err = parse_id("not-a-uuid").unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_missed_swap_is_a_conflict() {
        let err = saved_or_conflict::<()>(None).unwrap_err();
        assert_eq!(err.status_code(), 409);
        assert_eq!(err.error_code(), "CONFLICT");

        assert_eq!(saved_or_conflict(Some(7)).unwrap(), 7);
    }
}
