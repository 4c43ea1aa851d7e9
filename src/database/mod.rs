pub mod book_store;
pub mod codex_store;
pub mod gateway;
pub mod kind;
pub mod manager;
pub mod models;
pub mod series_store;

pub use book_store::BookStore;
pub use codex_store::CodexStore;
pub use gateway::{OwnedGateway, ScopedGateway};
pub use kind::CodexKind;
pub use manager::{Database, StoreError};
pub use series_store::SeriesStore;
