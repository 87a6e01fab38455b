//! In-memory storage implementation for document stores.
//!
//! This module provides a simple but complete in-memory backend that stores
//! documents as BSON values in HashMaps with async-safe read-write locks.

use std::{cmp::Ordering, collections::HashMap, sync::Arc};
use async_trait::async_trait;
use bson::{Bson, Document};
use mea::rwlock::RwLock;
use tracing::debug;

use verdoc_core::{
    backend::{IndexKind, IndexSpec, StoreBackend, StoreBackendBuilder},
    document::{DocumentId, ID_FIELD},
    error::{DocumentStoreError, DocumentStoreResult},
    query::{Expr, Query, SortDirection},
};

use crate::evaluator::{Comparable, DocumentEvaluator};

type CollectionMap = HashMap<String, Bson>;
type StoreMap = HashMap<String, CollectionMap>;
type IndexMap = HashMap<String, Vec<IndexSpec>>;


/// Thread-safe in-memory document storage backend.
///
/// This struct implements the [`StoreBackend`] trait to provide a fully functional
/// document store that operates entirely in memory using async-aware read-write locks.
/// All documents are stored as BSON values indexed by the identity the store assigned
/// at insert time.
///
/// # Thread Safety
///
/// `InMemoryStore` is cloneable and uses `Arc`-wrapped internal state, allowing
/// it to be safely shared across async tasks. Multiple clones of the same instance
/// share the same underlying data.
///
/// # Conditional updates
///
/// [`update_one`](StoreBackend::update_one) evaluates its filter and applies the
/// field writes under a single write guard. Two concurrent version-guarded updates
/// naming the same stored version therefore behave exactly as they would against a
/// real store: at most one of them modifies the document.
///
/// # Performance
///
/// Queries scan all documents in a collection; the index registry is bookkeeping
/// only. For development and test datasets this is acceptable. For larger datasets,
/// use a persistent backend.
#[derive(Default, Clone, Debug)]
pub struct InMemoryStore {
    /// The main storage map: collection_name -> (identity -> document)
    store: Arc<RwLock<StoreMap>>,
    /// Registry of created indexes: collection_name -> index specs
    indexes: Arc<RwLock<IndexMap>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory document store.
    ///
    /// The returned store is ready for use and contains no collections or documents.
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(StoreMap::new())),
            indexes: Arc::new(RwLock::new(IndexMap::new())),
        }
    }

    /// Creates a builder for constructing an `InMemoryStore` with custom options.
    pub fn builder() -> InMemoryStoreBuilder {
        InMemoryStoreBuilder::default()
    }
}


#[async_trait]
impl StoreBackend for InMemoryStore {
    async fn insert_documents(
        &self,
        documents: Vec<Bson>,
        collection: &str,
    ) -> DocumentStoreResult<Vec<DocumentId>> {
        let mut store = self.store.write().await;
        let collection_map = store
            .entry(collection.to_string())
            .or_default();

        let mut assigned = Vec::with_capacity(documents.len());

        for document in documents {
            let mut fields = match document {
                Bson::Document(fields) => fields,
                _ => {
                    return Err(DocumentStoreError::InvalidDocument(
                        "Expected a field map".to_string(),
                    ));
                }
            };

            let id = DocumentId::new();
            fields.insert(ID_FIELD, Bson::from(id));

            collection_map.insert(id.to_string(), Bson::Document(fields));
            assigned.push(id);
        }

        Ok(assigned)
    }

    async fn find_document(
        &self,
        id: DocumentId,
        collection: &str,
    ) -> DocumentStoreResult<Option<Bson>> {
        let store = self.store.read().await;

        Ok(store
            .get(collection)
            .and_then(|collection_map| collection_map.get(&id.to_string()))
            .cloned())
    }

    async fn query_documents(
        &self,
        query: Query,
        collection: &str,
    ) -> DocumentStoreResult<Vec<Bson>> {
        let store = self.store.read().await;
        let collection_map = match store.get(collection) {
            Some(col) => col,
            None => return Ok(vec![]),
        };

        // Apply filter expressions if present
        let filtered_docs = match &query.filter {
            Some(filter) => DocumentEvaluator::filter_documents(
                collection_map.values(),
                filter,
            )?,
            None => collection_map
                .values()
                .cloned()
                .collect::<Vec<_>>(),
        };

        // Apply sorting if specified
        if let Some(sort) = &query.sort {
            let mut sorted_docs = filtered_docs;

            sorted_docs.sort_by(|a, b| {
                let left = a
                    .as_document()
                    .and_then(|doc| doc.get(&sort.field))
                    .map(Comparable::from)
                    .unwrap_or(Comparable::Null);
                let right = b
                    .as_document()
                    .and_then(|doc| doc.get(&sort.field))
                    .map(Comparable::from)
                    .unwrap_or(Comparable::Null);

                match sort.direction {
                    SortDirection::Asc => left.partial_cmp(&right).unwrap_or(Ordering::Equal),
                    SortDirection::Desc => right.partial_cmp(&left).unwrap_or(Ordering::Equal),
                }
            });

            return Ok(
                sorted_docs
                    .into_iter()
                    .skip(query.offset.unwrap_or(0))
                    .take(query.limit.unwrap_or(usize::MAX))
                    .collect()
            );
        }

        Ok(
            filtered_docs
                .into_iter()
                .skip(query.offset.unwrap_or(0))
                .take(query.limit.unwrap_or(usize::MAX))
                .collect()
        )
    }

    async fn update_one(
        &self,
        filter: Expr,
        set: Document,
        collection: &str,
    ) -> DocumentStoreResult<u64> {
        // The filter match and the field writes share one write guard; nothing
        // can interleave between them.
        let mut store = self.store.write().await;
        let collection_map = match store.get_mut(collection) {
            Some(col) => col,
            None => return Ok(0),
        };

        let mut matched_key = None;
        for (key, document) in collection_map.iter() {
            if DocumentEvaluator::new(document).evaluate(&filter)? {
                matched_key = Some(key.clone());
                break;
            }
        }

        let Some(key) = matched_key else {
            return Ok(0);
        };

        if let Some(fields) = collection_map
            .get_mut(&key)
            .and_then(Bson::as_document_mut)
        {
            for (field, value) in set {
                fields.insert(field, value);
            }
        }

        Ok(1)
    }

    async fn delete_documents(
        &self,
        ids: Vec<DocumentId>,
        collection: &str,
    ) -> DocumentStoreResult<u64> {
        let mut store = self.store.write().await;
        let collection_map = match store.get_mut(collection) {
            Some(col) => col,
            None => return Ok(0),
        };

        let mut deleted = 0;
        for id in ids {
            if collection_map.remove(&id.to_string()).is_some() {
                deleted += 1;
            }
        }

        Ok(deleted)
    }

    async fn create_collection(&self, name: &str) -> DocumentStoreResult<()> {
        self.store
            .write()
            .await
            .entry(name.to_string())
            .or_insert_with(HashMap::new);

        Ok(())
    }

    async fn drop_collection(&self, name: &str) -> DocumentStoreResult<()> {
        let mut store = self.store.write().await;

        if store.remove(name).is_none() {
            return Err(DocumentStoreError::CollectionNotFound(name.to_string()));
        }

        self.indexes.write().await.remove(name);

        Ok(())
    }

    async fn list_collections(&self) -> DocumentStoreResult<Vec<String>> {
        Ok(
            self.store
                .read()
                .await
                .keys()
                .cloned()
                .collect()
        )
    }

    async fn add_index(
        &self,
        collection: &str,
        field: &str,
        kind: IndexKind,
    ) -> DocumentStoreResult<()> {
        let mut indexes = self.indexes.write().await;
        let specs = indexes
            .entry(collection.to_string())
            .or_default();

        let spec = IndexSpec { field: field.to_string(), kind };

        // Re-creating an identical index is a no-op, matching store behavior.
        if !specs.contains(&spec) {
            debug!(collection, field, "index registered");
            specs.push(spec);
        }

        Ok(())
    }

    async fn list_indexes(&self, collection: &str) -> DocumentStoreResult<Vec<IndexSpec>> {
        Ok(
            self.indexes
                .read()
                .await
                .get(collection)
                .cloned()
                .unwrap_or_default()
        )
    }
}


/// Builder for constructing [`InMemoryStore`] instances.
///
/// Currently a no-op builder, but can be extended in future versions
/// to support configuration options like capacity hints.
#[derive(Default)]
pub struct InMemoryStoreBuilder;

#[async_trait]
impl StoreBackendBuilder for InMemoryStoreBuilder {
    type Backend = InMemoryStore;

    /// Builds and returns a new [`InMemoryStore`] instance.
    ///
    /// This always succeeds and returns a freshly initialized store.
    async fn build(self) -> DocumentStoreResult<Self::Backend> {
        Ok(InMemoryStore::new())
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;
    use verdoc_core::query::Filter;

    fn jedi(name: &str, age: i32, version: i64) -> Bson {
        Bson::Document(doc! { "name": name, "age": age, "version": version })
    }

    #[tokio::test]
    async fn insert_assigns_distinct_identities_and_stamps_them() {
        let store = InMemoryStore::new();

        let ids = store
            .insert_documents(vec![jedi("Luke", 19, 0), jedi("Yoda", 534, 0)], "jedi")
            .await
            .unwrap();

        assert_eq!(ids.len(), 2);
        assert_ne!(ids[0], ids[1]);

        let found = store.find_document(ids[0], "jedi").await.unwrap().unwrap();
        let fields = found.as_document().unwrap();
        assert_eq!(fields.get(ID_FIELD), Some(&Bson::from(ids[0])));
        assert_eq!(fields.get("name"), Some(&Bson::String("Luke".to_string())));
    }

    #[tokio::test]
    async fn update_one_against_missing_collection_matches_nothing() {
        let store = InMemoryStore::new();

        let modified = store
            .update_one(Filter::eq("name", "Luke"), doc! { "age": 20 }, "jedi")
            .await
            .unwrap();

        assert_eq!(modified, 0);
    }

    #[tokio::test]
    async fn version_guarded_filter_matches_each_token_at_most_once() {
        let store = InMemoryStore::new();
        let ids = store
            .insert_documents(vec![jedi("Yoda", 534, 0)], "jedi")
            .await
            .unwrap();

        let guard = Filter::id(ids[0]).and(Filter::eq("version", 0i64));

        let first = store
            .update_one(guard.clone(), doc! { "age": 1534, "version": 1i64 }, "jedi")
            .await
            .unwrap();
        assert_eq!(first, 1);

        // The stored version moved on, so the same token matches nothing now.
        let second = store
            .update_one(guard, doc! { "age": 2534, "version": 1i64 }, "jedi")
            .await
            .unwrap();
        assert_eq!(second, 0);
    }

    #[tokio::test]
    async fn delete_counts_only_removed_documents() {
        let store = InMemoryStore::new();
        let ids = store
            .insert_documents(vec![jedi("Luke", 19, 0)], "jedi")
            .await
            .unwrap();

        assert_eq!(store.delete_documents(ids.clone(), "jedi").await.unwrap(), 1);
        assert_eq!(store.delete_documents(ids, "jedi").await.unwrap(), 0);
    }
}
