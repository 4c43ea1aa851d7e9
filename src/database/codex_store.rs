use async_trait::async_trait;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use super::gateway::ScopedGateway;
use super::kind::CodexKind;
use super::manager::StoreError;
use super::models::{BookRef, CodexEntry, CodexView, NewCodexEntry, SeriesRef};

const ENTRY_COLUMNS: &str = "id, name, summary, details, series_id, revision, created_at, updated_at";
const PREFIXED_COLUMNS: &str =
    "e.id, e.name, e.summary, e.details, e.series_id, e.revision, e.created_at, e.updated_at";

/// Data access for one codex kind. The same store code serves every kind;
/// only the identifiers from the [`CodexKind`] descriptor differ, and those
/// are static registry constants, never caller input.
pub struct CodexStore {
    kind: &'static CodexKind,
    pool: PgPool,
}

impl CodexStore {
    pub fn new(kind: &'static CodexKind, pool: PgPool) -> Self {
        Self { kind, pool }
    }

    pub fn kind(&self) -> &'static CodexKind {
        self.kind
    }

    /// Attach the parent series and linked books to an entry.
    async fn load_relations(&self, entry: CodexEntry) -> Result<CodexView, StoreError> {
        let series = match entry.series_id {
            Some(series_id) => {
                sqlx::query_as::<_, SeriesRef>("SELECT id, title FROM series WHERE id = $1")
                    .bind(series_id)
                    .fetch_optional(&self.pool)
                    .await?
            }
            None => None,
        };

        let books = sqlx::query_as::<_, BookRef>(&format!(
            "SELECT b.id, b.title FROM books b \
             JOIN {link} l ON l.book_id = b.id \
             WHERE l.{column} = $1 ORDER BY b.created_at",
            link = self.kind.link_table,
            column = self.kind.link_column,
        ))
        .bind(entry.id)
        .fetch_all(&self.pool)
        .await?;

        Ok(CodexView {
            entry,
            series: Some(series),
            books: Some(books),
        })
    }

    async fn view(&self, entry: CodexEntry, with_relations: bool) -> Result<CodexView, StoreError> {
        if with_relations {
            self.load_relations(entry).await
        } else {
            Ok(CodexView::bare(entry))
        }
    }

    /// Insert an entry and, when a book parent resolved, its link row, in
    /// one transaction. `series` and `book` are the resolved parents, not
    /// the caller's raw hints.
    pub async fn create(
        &self,
        draft: &NewCodexEntry,
        series: Option<Uuid>,
        book: Option<Uuid>,
    ) -> Result<CodexEntry, StoreError> {
        let details = draft.details.clone().unwrap_or_else(|| json!({}));

        let mut tx = self.pool.begin().await?;

        let entry = sqlx::query_as::<_, CodexEntry>(&format!(
            "INSERT INTO {table} (name, summary, details, series_id) VALUES ($1, $2, $3, $4) \
             RETURNING {ENTRY_COLUMNS}",
            table = self.kind.table,
        ))
        .bind(&draft.name)
        .bind(&draft.summary)
        .bind(&details)
        .bind(series)
        .fetch_one(&mut *tx)
        .await?;

        if let Some(book_id) = book {
            sqlx::query(&format!(
                "INSERT INTO {link} ({column}, book_id) VALUES ($1, $2)",
                link = self.kind.link_table,
                column = self.kind.link_column,
            ))
            .bind(entry.id)
            .bind(book_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(entry)
    }

    /// Compare-and-swap save; None means the revision moved underneath us,
    /// including the row disappearing entirely.
    pub async fn save(&self, entry: &CodexEntry) -> Result<Option<CodexEntry>, StoreError> {
        let row = sqlx::query_as::<_, CodexEntry>(&format!(
            "UPDATE {table} SET name = $3, summary = $4, details = $5, \
             revision = revision + 1, updated_at = now() \
             WHERE id = $1 AND revision = $2 \
             RETURNING {ENTRY_COLUMNS}",
            table = self.kind.table,
        ))
        .bind(entry.id)
        .bind(entry.revision)
        .bind(&entry.name)
        .bind(&entry.summary)
        .bind(&entry.details)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Delete by id; link rows cascade. The caller resolves scope first.
    pub async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        sqlx::query(&format!("DELETE FROM {table} WHERE id = $1", table = self.kind.table))
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl ScopedGateway for CodexStore {
    type Record = CodexView;

    async fn list_for_principal(&self, principal: Uuid) -> Result<Vec<CodexView>, StoreError> {
        let rows = sqlx::query_as::<_, CodexEntry>(&format!(
            "SELECT {PREFIXED_COLUMNS} FROM {table} e \
             WHERE EXISTS (SELECT 1 FROM series s WHERE s.id = e.series_id AND s.user_id = $1) \
                OR EXISTS (SELECT 1 FROM {link} l JOIN books b ON b.id = l.book_id \
                           WHERE l.{column} = e.id AND b.user_id = $1) \
             ORDER BY e.created_at",
            table = self.kind.table,
            link = self.kind.link_table,
            column = self.kind.link_column,
        ))
        .bind(principal)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(CodexView::bare).collect())
    }

    async fn list_for_principal_and_series(
        &self,
        principal: Uuid,
        series: Uuid,
    ) -> Result<Vec<CodexView>, StoreError> {
        let rows = sqlx::query_as::<_, CodexEntry>(&format!(
            "SELECT {PREFIXED_COLUMNS} FROM {table} e \
             JOIN series s ON s.id = e.series_id \
             WHERE e.series_id = $2 AND s.user_id = $1 \
             ORDER BY e.created_at",
            table = self.kind.table,
        ))
        .bind(principal)
        .bind(series)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(CodexView::bare).collect())
    }

    async fn list_for_principal_and_book(
        &self,
        principal: Uuid,
        book: Uuid,
    ) -> Result<Vec<CodexView>, StoreError> {
        let rows = sqlx::query_as::<_, CodexEntry>(&format!(
            "SELECT {PREFIXED_COLUMNS} FROM {table} e \
             JOIN {link} l ON l.{column} = e.id \
             JOIN books b ON b.id = l.book_id \
             WHERE b.id = $2 AND b.user_id = $1 \
             ORDER BY e.created_at",
            table = self.kind.table,
            link = self.kind.link_table,
            column = self.kind.link_column,
        ))
        .bind(principal)
        .bind(book)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(CodexView::bare).collect())
    }

    async fn get_for_principal_and_series(
        &self,
        id: Uuid,
        principal: Uuid,
        series: Uuid,
        with_relations: bool,
    ) -> Result<Option<CodexView>, StoreError> {
        let row = sqlx::query_as::<_, CodexEntry>(&format!(
            "SELECT {PREFIXED_COLUMNS} FROM {table} e \
             JOIN series s ON s.id = e.series_id \
             WHERE e.id = $1 AND e.series_id = $2 AND s.user_id = $3",
            table = self.kind.table,
        ))
        .bind(id)
        .bind(series)
        .bind(principal)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(entry) => Ok(Some(self.view(entry, with_relations).await?)),
            None => Ok(None),
        }
    }

    async fn get_for_principal_and_book(
        &self,
        id: Uuid,
        principal: Uuid,
        book: Uuid,
        with_relations: bool,
    ) -> Result<Option<CodexView>, StoreError> {
        let row = sqlx::query_as::<_, CodexEntry>(&format!(
            "SELECT {PREFIXED_COLUMNS} FROM {table} e \
             JOIN {link} l ON l.{column} = e.id \
             JOIN books b ON b.id = l.book_id \
             WHERE e.id = $1 AND b.id = $2 AND b.user_id = $3",
            table = self.kind.table,
            link = self.kind.link_table,
            column = self.kind.link_column,
        ))
        .bind(id)
        .bind(book)
        .bind(principal)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(entry) => Ok(Some(self.view(entry, with_relations).await?)),
            None => Ok(None),
        }
    }
}
