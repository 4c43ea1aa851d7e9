pub mod book;
pub mod codex;
pub mod series;
pub mod user;

pub use book::{Book, BookPatch, BookRef, BookView, NewBook};
pub use codex::{CodexEntry, CodexPatch, CodexView, NewCodexEntry};
pub use series::{NewSeries, Series, SeriesPatch, SeriesRef, SeriesView};
pub use user::User;

use serde::{Deserialize, Deserializer};

/// Distinguishes an absent patch field (outer None) from an explicit JSON
/// null (Some(None)). Pair with #[serde(default)].
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
