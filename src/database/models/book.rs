use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::series::SeriesRef;

/// A book owned by a user, optionally shelved under one of their series.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: Uuid,
    pub user_id: Uuid,
    pub series_id: Option<Uuid>,
    pub title: String,
    pub summary: Option<String>,
    pub revision: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Book with its parent series attached. Outer Option: was the relation
/// loaded at all. Inner Option: standalone books have no series.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookView {
    #[serde(flatten)]
    pub book: Book,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series: Option<Option<SeriesRef>>,
}

impl BookView {
    pub fn bare(book: Book) -> Self {
        Self { book, series: None }
    }
}

/// Lightweight reference used when a book appears nested inside another
/// record.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BookRef {
    pub id: Uuid,
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBook {
    pub title: String,
    pub summary: Option<String>,
    /// Optional shelving under one of the caller's series, checked against
    /// their ownership before the insert.
    pub series_id: Option<Uuid>,
}

/// Partial update. Shelving is fixed at creation; a patch carries only
/// descriptive fields.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookPatch {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub summary: Option<Option<String>>,
}

impl BookPatch {
    pub fn apply_to(&self, book: &Book) -> Book {
        Book {
            title: self.title.clone().unwrap_or_else(|| book.title.clone()),
            summary: match &self.summary {
                Some(value) => value.clone(),
                None => book.summary.clone(),
            },
            ..book.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Book {
        Book {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            series_id: None,
            title: "Emberfall".to_string(),
            summary: None,
            revision: 1,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_patch_keeps_unsupplied_fields() {
        let book = sample();
        let patch: BookPatch =
            serde_json::from_str(r#"{"summary": "Book one of the cycle"}"#).unwrap();

        let merged = patch.apply_to(&book);
        assert_eq!(merged.title, "Emberfall");
        assert_eq!(merged.summary.as_deref(), Some("Book one of the cycle"));
    }

    #[test]
    fn test_standalone_book_serializes_null_series_when_loaded() {
        let view = BookView {
            book: sample(),
            series: Some(None),
        };
        let json = serde_json::to_value(&view).unwrap();
        assert!(json["series"].is_null());
        // The key itself is present once relations were loaded.
        assert!(json.as_object().unwrap().contains_key("series"));
    }
}
