use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use super::book::BookRef;
use super::series::SeriesRef;

/// A worldbuilding record: one row of whichever codex kind the request
/// addressed (group, magic system, technology, world, ...). All kinds
/// share this exact column shape.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CodexEntry {
    pub id: Uuid,
    pub name: String,
    pub summary: Option<String>,
    /// Free-form kind-specific attributes.
    pub details: Value,
    pub series_id: Option<Uuid>,
    pub revision: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Codex entry with its parents attached. `series`/`books` only appear in
/// the JSON when relations were loaded; a loaded-but-absent series parent
/// serializes as null, a loaded book list as an array (possibly empty).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodexView {
    #[serde(flatten)]
    pub entry: CodexEntry,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series: Option<Option<SeriesRef>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub books: Option<Vec<BookRef>>,
}

impl CodexView {
    pub fn bare(entry: CodexEntry) -> Self {
        Self {
            entry,
            series: None,
            books: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCodexEntry {
    pub name: String,
    pub summary: Option<String>,
    pub details: Option<Value>,
    /// Parent hints. At least one must resolve to a series or book the
    /// caller owns, or the record is rejected before any insert.
    pub series_id: Option<Uuid>,
    pub book_id: Option<Uuid>,
}

/// Partial update. Absent fields stay untouched; `summary` accepts JSON
/// null to clear. `details` is replaced wholesale, never deep-merged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodexPatch {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub summary: Option<Option<String>>,
    pub details: Option<Value>,
}

impl CodexPatch {
    pub fn apply_to(&self, entry: &CodexEntry) -> CodexEntry {
        CodexEntry {
            name: self.name.clone().unwrap_or_else(|| entry.name.clone()),
            summary: match &self.summary {
                Some(value) => value.clone(),
                None => entry.summary.clone(),
            },
            details: self.details.clone().unwrap_or_else(|| entry.details.clone()),
            ..entry.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> CodexEntry {
        CodexEntry {
            id: Uuid::new_v4(),
            name: "The Veiled Court".to_string(),
            summary: Some("A secret society".to_string()),
            details: json!({"alignment": "neutral", "members": 12}),
            series_id: Some(Uuid::new_v4()),
            revision: 2,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_patch_is_shallow_details_replaced_wholesale() {
        let entry = sample();
        let patch: CodexPatch =
            serde_json::from_str(r#"{"details": {"members": 13}}"#).unwrap();

        let merged = patch.apply_to(&entry);
        // Shallow: the old "alignment" key does not survive a details patch.
        assert_eq!(merged.details, json!({"members": 13}));
        assert_eq!(merged.name, entry.name);
    }

    #[test]
    fn test_patch_preserves_identity_and_revision() {
        let entry = sample();
        let patch: CodexPatch = serde_json::from_str(r#"{"name": "The Open Court"}"#).unwrap();

        let merged = patch.apply_to(&entry);
        assert_eq!(merged.id, entry.id);
        assert_eq!(merged.revision, entry.revision);
        assert_eq!(merged.series_id, entry.series_id);
        assert_eq!(merged.name, "The Open Court");
    }

    #[test]
    fn test_null_summary_clears_it() {
        let entry = sample();
        let patch: CodexPatch = serde_json::from_str(r#"{"summary": null}"#).unwrap();
        assert_eq!(patch.apply_to(&entry).summary, None);
    }

    #[test]
    fn test_relations_omitted_until_loaded() {
        let view = CodexView::bare(sample());
        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("series").is_none());
        assert!(json.get("books").is_none());

        let loaded = CodexView {
            series: Some(None),
            books: Some(vec![]),
            ..view
        };
        let json = serde_json::to_value(&loaded).unwrap();
        assert!(json["series"].is_null());
        assert_eq!(json["books"], json!([]));
    }
}
