use async_trait::async_trait;
use uuid::Uuid;

use super::manager::StoreError;

/// Storage contract for record types with a single ownership path (series
/// and books, which hang directly off a user). A lookup either finds the
/// record under the given principal or it does not; there is no scope hint
/// to consider.
#[async_trait]
pub trait OwnedGateway: Send + Sync {
    type Record: Send;

    /// Fetch one record if it belongs to the principal.
    async fn get_for_principal(
        &self,
        id: Uuid,
        principal: Uuid,
    ) -> Result<Option<Self::Record>, StoreError>;
}

/// Storage contract for codex records, which reach their owner through a
/// series parent, through book parents, or both. Every method is already
/// ownership-filtered: a record that exists but belongs to someone else
/// comes back exactly like one that does not exist.
#[async_trait]
pub trait ScopedGateway: Send + Sync {
    type Record: Send;

    /// Everything the principal can reach through either path.
    async fn list_for_principal(&self, principal: Uuid) -> Result<Vec<Self::Record>, StoreError>;

    /// Records attached to one of the principal's series.
    async fn list_for_principal_and_series(
        &self,
        principal: Uuid,
        series: Uuid,
    ) -> Result<Vec<Self::Record>, StoreError>;

    /// Records linked to one of the principal's books.
    async fn list_for_principal_and_book(
        &self,
        principal: Uuid,
        book: Uuid,
    ) -> Result<Vec<Self::Record>, StoreError>;

    /// Fetch one record reachable through the given series.
    /// `with_relations` attaches the parent series and book references.
    async fn get_for_principal_and_series(
        &self,
        id: Uuid,
        principal: Uuid,
        series: Uuid,
        with_relations: bool,
    ) -> Result<Option<Self::Record>, StoreError>;

    /// Fetch one record reachable through the given book.
    async fn get_for_principal_and_book(
        &self,
        id: Uuid,
        principal: Uuid,
        book: Uuid,
        with_relations: bool,
    ) -> Result<Option<Self::Record>, StoreError>;
}
