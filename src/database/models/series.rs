use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::book::BookRef;

/// A series owned by a user. The top of the ownership graph together with
/// standalone books.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub summary: Option<String>,
    pub revision: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Series with its books attached. The `books` field only appears in the
/// JSON when relations were actually loaded.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesView {
    #[serde(flatten)]
    pub series: Series,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub books: Option<Vec<BookRef>>,
}

impl SeriesView {
    pub fn bare(series: Series) -> Self {
        Self { series, books: None }
    }
}

/// Lightweight reference used when a series appears nested inside another
/// record.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SeriesRef {
    pub id: Uuid,
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSeries {
    pub title: String,
    pub summary: Option<String>,
}

/// Partial update. A field that is absent stays untouched; `summary` may
/// be set to JSON null to clear it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPatch {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub summary: Option<Option<String>>,
}

impl SeriesPatch {
    /// Shallow merge over the fetched record, leaving id/revision/audit
    /// columns alone.
    pub fn apply_to(&self, series: &Series) -> Series {
        Series {
            title: self.title.clone().unwrap_or_else(|| series.title.clone()),
            summary: match &self.summary {
                Some(value) => value.clone(),
                None => series.summary.clone(),
            },
            ..series.clone()
        }
    }
}
