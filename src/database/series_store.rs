use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::gateway::OwnedGateway;
use super::manager::StoreError;
use super::models::{BookRef, NewSeries, Series, SeriesView};

const SERIES_COLUMNS: &str = "id, user_id, title, summary, revision, created_at, updated_at";

/// Data access for series. Everything here filters by the owning user;
/// there is no unscoped lookup.
pub struct SeriesStore {
    pool: PgPool,
}

impl SeriesStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_for_principal(&self, principal: Uuid) -> Result<Vec<Series>, StoreError> {
        let rows = sqlx::query_as::<_, Series>(&format!(
            "SELECT {SERIES_COLUMNS} FROM series WHERE user_id = $1 ORDER BY created_at"
        ))
        .bind(principal)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Fetch a series with its books attached.
    pub async fn get_with_books(
        &self,
        id: Uuid,
        principal: Uuid,
    ) -> Result<Option<SeriesView>, StoreError> {
        let Some(series) = self.get_for_principal(id, principal).await? else {
            return Ok(None);
        };

        let books = sqlx::query_as::<_, BookRef>(
            "SELECT id, title FROM books WHERE series_id = $1 ORDER BY created_at",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(SeriesView {
            series,
            books: Some(books),
        }))
    }

    pub async fn create(&self, principal: Uuid, draft: NewSeries) -> Result<Series, StoreError> {
        let row = sqlx::query_as::<_, Series>(&format!(
            "INSERT INTO series (user_id, title, summary) VALUES ($1, $2, $3) \
             RETURNING {SERIES_COLUMNS}"
        ))
        .bind(principal)
        .bind(&draft.title)
        .bind(&draft.summary)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Compare-and-swap save: the update only lands if the row still
    /// carries the revision this snapshot was read at. None means another
    /// writer (or a delete) got there first.
    pub async fn save(&self, series: &Series) -> Result<Option<Series>, StoreError> {
        let row = sqlx::query_as::<_, Series>(&format!(
            "UPDATE series SET title = $3, summary = $4, revision = revision + 1, updated_at = now() \
             WHERE id = $1 AND revision = $2 \
             RETURNING {SERIES_COLUMNS}"
        ))
        .bind(series.id)
        .bind(series.revision)
        .bind(&series.title)
        .bind(&series.summary)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Delete by id. The caller resolves ownership first; deleting a row
    /// that is already gone is a no-op, not an error.
    pub async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM series WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl OwnedGateway for SeriesStore {
    type Record = Series;

    async fn get_for_principal(
        &self,
        id: Uuid,
        principal: Uuid,
    ) -> Result<Option<Series>, StoreError> {
        let row = sqlx::query_as::<_, Series>(&format!(
            "SELECT {SERIES_COLUMNS} FROM series WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(principal)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }
}
