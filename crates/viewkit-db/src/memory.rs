//! In-memory document store.

use std::ops::Range;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use viewkit_core::{ViewError, ViewResult};

use crate::document::Document;
use crate::filter::Filter;
use crate::object_id::ObjectId;
use crate::store::DocumentStore;

/// A [`DocumentStore`] backed by a vector, in insertion order.
///
/// Cloning shares the underlying collection. Suitable for tests, demos and
/// small read-mostly datasets.
///
/// # Examples
///
/// ```ignore
/// let store = MemoryStore::from_documents(users);
/// let user = store.get(&Filter::new().with("username", Some("bar"))).await?;
/// ```
#[derive(Debug)]
pub struct MemoryStore<D> {
    docs: Arc<RwLock<Vec<D>>>,
}

impl<D> Clone for MemoryStore<D> {
    fn clone(&self) -> Self {
        Self {
            docs: Arc::clone(&self.docs),
        }
    }
}

impl<D> Default for MemoryStore<D> {
    fn default() -> Self {
        Self {
            docs: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

impl<D: Document> MemoryStore<D> {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding `docs`, assigning ids to any that lack one.
    pub fn from_documents(docs: impl IntoIterator<Item = D>) -> Self {
        let docs = docs
            .into_iter()
            .map(|mut doc| {
                if doc.id().is_none() {
                    doc.set_id(ObjectId::new());
                }
                doc
            })
            .collect();
        Self {
            docs: Arc::new(RwLock::new(docs)),
        }
    }

    /// Returns the total number of stored documents.
    pub fn len(&self) -> ViewResult<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> ViewResult<bool> {
        Ok(self.read()?.is_empty())
    }

    fn read(&self) -> ViewResult<RwLockReadGuard<'_, Vec<D>>> {
        self.docs
            .read()
            .map_err(|_| ViewError::DatabaseError(format!("{} store lock poisoned", D::NAME)))
    }

    fn write(&self) -> ViewResult<RwLockWriteGuard<'_, Vec<D>>> {
        self.docs
            .write()
            .map_err(|_| ViewError::DatabaseError(format!("{} store lock poisoned", D::NAME)))
    }

    fn matching(&self, filter: &Filter) -> ViewResult<Vec<D>> {
        Ok(self
            .read()?
            .iter()
            .filter(|doc| filter.matches(*doc))
            .cloned()
            .collect())
    }
}

#[async_trait::async_trait]
impl<D: Document> DocumentStore<D> for MemoryStore<D> {
    async fn get(&self, filter: &Filter) -> ViewResult<D> {
        let mut found = self.matching(filter)?;
        tracing::debug!(document = D::NAME, %filter, matches = found.len(), "memory store get");
        match found.len() {
            0 => Err(ViewError::DoesNotExist(format!(
                "{} matching {filter}",
                D::NAME
            ))),
            1 => Ok(found.remove(0)),
            n => Err(ViewError::MultipleObjectsReturned(format!(
                "{n} {} documents matching {filter}",
                D::NAME
            ))),
        }
    }

    async fn find(&self, filter: &Filter, range: Range<usize>) -> ViewResult<Vec<D>> {
        if range.end < range.start {
            return Err(ViewError::IndexOutOfRange(format!(
                "{}..{}",
                range.start, range.end
            )));
        }
        let docs = self.read()?;
        Ok(docs
            .iter()
            .filter(|doc| filter.matches(*doc))
            .skip(range.start)
            .take(range.end - range.start)
            .cloned()
            .collect())
    }

    async fn count(&self, filter: &Filter) -> ViewResult<usize> {
        Ok(self.read()?.iter().filter(|doc| filter.matches(*doc)).count())
    }

    async fn all(&self, filter: &Filter) -> ViewResult<Vec<D>> {
        self.matching(filter)
    }

    async fn save(&self, doc: &mut D) -> ViewResult<()> {
        let mut docs = self.write()?;
        if let Some(id) = doc.id() {
            if let Some(slot) = docs.iter_mut().find(|d| d.id() == Some(id)) {
                *slot = doc.clone();
                tracing::debug!(document = D::NAME, %id, "updated document");
                return Ok(());
            }
        } else {
            doc.set_id(ObjectId::new());
        }
        docs.push(doc.clone());
        tracing::debug!(document = D::NAME, id = ?doc.id(), "inserted document");
        Ok(())
    }

    async fn delete(&self, doc: &D) -> ViewResult<bool> {
        let Some(id) = doc.id() else {
            return Ok(false);
        };
        let mut docs = self.write()?;
        let before = docs.len();
        docs.retain(|d| d.id() != Some(id));
        Ok(docs.len() != before)
    }
}
