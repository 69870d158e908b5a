//! The async storage interface views depend on.

use std::ops::Range;

use viewkit_core::ViewResult;

use crate::document::Document;
use crate::filter::Filter;

/// Async access to a collection of documents of one type.
///
/// Views hold a store as `Arc<dyn DocumentStore<D>>`, so any backend that
/// implements this trait can serve them. Results are returned in the
/// store's natural order, which must be stable between calls so that
/// paginated slices do not overlap.
#[async_trait::async_trait]
pub trait DocumentStore<D: Document>: Send + Sync {
    /// Returns the single document matching `filter`.
    ///
    /// Fails with `DoesNotExist` when nothing matches and with
    /// `MultipleObjectsReturned` when more than one document matches.
    async fn get(&self, filter: &Filter) -> ViewResult<D>;

    /// Returns the matching documents at positions `range.start..range.end`.
    ///
    /// A range starting past the last match yields an empty vector. A range
    /// with `end < start` fails with `IndexOutOfRange`.
    async fn find(&self, filter: &Filter, range: Range<usize>) -> ViewResult<Vec<D>>;

    /// Returns the number of matching documents.
    async fn count(&self, filter: &Filter) -> ViewResult<usize>;

    /// Returns every matching document.
    async fn all(&self, filter: &Filter) -> ViewResult<Vec<D>>;

    /// Inserts or updates a document, assigning an id on first save.
    async fn save(&self, doc: &mut D) -> ViewResult<()>;

    /// Removes a document by id. Returns `false` if it was not stored.
    async fn delete(&self, doc: &D) -> ViewResult<bool>;
}
