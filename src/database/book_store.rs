use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::gateway::OwnedGateway;
use super::manager::StoreError;
use super::models::{Book, BookView, NewBook, SeriesRef};

const BOOK_COLUMNS: &str = "id, user_id, series_id, title, summary, revision, created_at, updated_at";

/// Data access for books. Everything here filters by the owning user.
pub struct BookStore {
    pool: PgPool,
}

impl BookStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_for_principal(&self, principal: Uuid) -> Result<Vec<Book>, StoreError> {
        let rows = sqlx::query_as::<_, Book>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books WHERE user_id = $1 ORDER BY created_at"
        ))
        .bind(principal)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Books the principal shelved under one of their series.
    pub async fn list_for_principal_in_series(
        &self,
        principal: Uuid,
        series: Uuid,
    ) -> Result<Vec<Book>, StoreError> {
        let rows = sqlx::query_as::<_, Book>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books WHERE user_id = $1 AND series_id = $2 \
             ORDER BY created_at"
        ))
        .bind(principal)
        .bind(series)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Fetch a book with its parent series attached. A standalone book
    /// reports an explicit null parent.
    pub async fn get_with_series(
        &self,
        id: Uuid,
        principal: Uuid,
    ) -> Result<Option<BookView>, StoreError> {
        let Some(book) = self.get_for_principal(id, principal).await? else {
            return Ok(None);
        };

        let series = match book.series_id {
            Some(series_id) => {
                sqlx::query_as::<_, SeriesRef>("SELECT id, title FROM series WHERE id = $1")
                    .bind(series_id)
                    .fetch_optional(&self.pool)
                    .await?
            }
            None => None,
        };

        Ok(Some(BookView {
            book,
            series: Some(series),
        }))
    }

    /// Insert a book. `series` must already be resolved against the
    /// principal's ownership; this method trusts it.
    pub async fn create(
        &self,
        principal: Uuid,
        draft: &NewBook,
        series: Option<Uuid>,
    ) -> Result<Book, StoreError> {
        let row = sqlx::query_as::<_, Book>(&format!(
            "INSERT INTO books (user_id, series_id, title, summary) VALUES ($1, $2, $3, $4) \
             RETURNING {BOOK_COLUMNS}"
        ))
        .bind(principal)
        .bind(series)
        .bind(&draft.title)
        .bind(&draft.summary)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Compare-and-swap save; None means the revision moved underneath us.
    pub async fn save(&self, book: &Book) -> Result<Option<Book>, StoreError> {
        let row = sqlx::query_as::<_, Book>(&format!(
            "UPDATE books SET title = $3, summary = $4, revision = revision + 1, updated_at = now() \
             WHERE id = $1 AND revision = $2 \
             RETURNING {BOOK_COLUMNS}"
        ))
        .bind(book.id)
        .bind(book.revision)
        .bind(&book.title)
        .bind(&book.summary)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl OwnedGateway for BookStore {
    type Record = Book;

    async fn get_for_principal(
        &self,
        id: Uuid,
        principal: Uuid,
    ) -> Result<Option<Book>, StoreError> {
        let row = sqlx::query_as::<_, Book>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(principal)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }
}
