//! Storage backend abstraction for the document store.
//!
//! This module defines the core trait that abstracts over different storage
//! implementations, allowing the document store to work with various backends
//! (in-memory, MongoDB, etc.).
//!
//! # Overview
//!
//! The [`StoreBackend`] trait provides a unified async interface for all storage
//! operations: document insertion, identity lookup, querying, the conditional
//! field-level update underpinning optimistic concurrency, deletion, and
//! collection/index management. Implementations are required to be thread-safe
//! (`Send + Sync`) and support concurrent access; every method is a suspension
//! point.
//!
//! # The conditional update
//!
//! [`StoreBackend::update_one`] is the single point of truth for optimistic
//! concurrency: the filter match and the write must be one atomic step at the
//! store. Two concurrent updates whose filters both name the same stored
//! version can never both report a modification.

use async_trait::async_trait;
use bson::{Bson, Document};
use std::fmt::Debug;

use crate::{document::DocumentId, error::DocumentStoreResult, query::{Expr, Query}};

/// The kind of index to create on a collection field.
#[derive(Debug, Clone, PartialEq)]
pub enum IndexKind {
    /// A plain value index, optionally enforcing uniqueness.
    Value {
        /// Whether the index should enforce uniqueness constraints.
        unique: bool,
    },
    /// A spherical geospatial index over a GeoJSON point field.
    Geo2dSphere,
}

/// A created index: the indexed field and the kind of index.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexSpec {
    /// The indexed field name.
    pub field: String,
    /// The kind of index.
    pub kind: IndexKind,
}

/// Abstract interface for document storage backends.
///
/// Implementers of this trait provide concrete storage strategies for documents.
/// The trait defines the operations the collection and store layers compose:
/// identity-assigning insertion, lookup, filtered queries, the atomic
/// conditional update, counted deletion, and collection/index administration.
///
/// # Thread Safety
///
/// All implementations must be thread-safe and support concurrent access from
/// multiple async tasks. No mutual exclusion is provided above this trait; the
/// only consistency mechanism the upper layers rely on is the atomicity of
/// [`update_one`](StoreBackend::update_one).
///
/// # Error Handling
///
/// Operations return [`DocumentStoreResult<T>`](crate::error::DocumentStoreResult).
/// Backend-specific failures are wrapped as
/// [`DocumentStoreError::Backend`](crate::error::DocumentStoreError::Backend)
/// and propagate to the caller untranslated.
#[async_trait]
pub trait StoreBackend: Send + Sync + Debug {
    /// Inserts new documents into a collection, assigning a fresh identity to each.
    ///
    /// Any identity present in the supplied documents has already been stripped
    /// by the collection layer; the backend generates one per document, stamps
    /// it under the reserved identity field, and returns the assigned identities
    /// in input order. The collection is created implicitly if it doesn't exist.
    ///
    /// # Arguments
    ///
    /// * `documents` - BSON documents to insert
    /// * `collection` - The name of the collection to insert into
    async fn insert_documents(
        &self,
        documents: Vec<Bson>,
        collection: &str,
    ) -> DocumentStoreResult<Vec<DocumentId>>;

    /// Retrieves a single document by its identity.
    ///
    /// Returns `Ok(None)` when the identity or the collection is absent; a
    /// miss is never an error.
    async fn find_document(
        &self,
        id: DocumentId,
        collection: &str,
    ) -> DocumentStoreResult<Option<Bson>>;

    /// Queries documents in a collection using a structured query.
    ///
    /// Applies filter expressions, sorting, and pagination to select matching
    /// documents. An absent collection yields an empty result.
    async fn query_documents(
        &self,
        query: Query,
        collection: &str,
    ) -> DocumentStoreResult<Vec<Bson>>;

    /// Atomically applies a field-level update to at most one matching document.
    ///
    /// Every `(field, value)` pair in `set` is written onto the first document
    /// matching `filter`; the match and the write are a single atomic step at
    /// the store. Returns the modified count (0 or 1). A zero count means the
    /// filter matched nothing - the caller decides what that implies.
    ///
    /// # Arguments
    ///
    /// * `filter` - The match condition (typically identity, or identity plus version)
    /// * `set` - The fields to write onto the matched document
    /// * `collection` - The name of the collection containing the document
    async fn update_one(
        &self,
        filter: Expr,
        set: Document,
        collection: &str,
    ) -> DocumentStoreResult<u64>;

    /// Deletes documents from a collection by their identities.
    ///
    /// Absent identities are skipped silently; the returned count is the number
    /// of documents actually removed.
    async fn delete_documents(
        &self,
        ids: Vec<DocumentId>,
        collection: &str,
    ) -> DocumentStoreResult<u64>;

    /// Creates a new collection with the specified name.
    async fn create_collection(&self, name: &str) -> DocumentStoreResult<()>;

    /// Drops (deletes) a collection and all its documents.
    ///
    /// # Warning
    ///
    /// This operation is irreversible.
    async fn drop_collection(&self, name: &str) -> DocumentStoreResult<()>;

    /// Lists the names of all collections in the store.
    async fn list_collections(&self) -> DocumentStoreResult<Vec<String>>;

    /// Creates an index on a field in a collection.
    ///
    /// # Arguments
    ///
    /// * `collection` - The name of the collection
    /// * `field` - The name of the field to index
    /// * `kind` - The kind of index (plain value or geospatial)
    async fn add_index(
        &self,
        collection: &str,
        field: &str,
        kind: IndexKind,
    ) -> DocumentStoreResult<()>;

    /// Lists the indexes created on a collection.
    async fn list_indexes(&self, collection: &str) -> DocumentStoreResult<Vec<IndexSpec>>;

    /// Cleanly shuts down the backend, releasing all resources.
    ///
    /// The default implementation is a no-op, but backends with external
    /// connections should override this.
    async fn shutdown(self) -> DocumentStoreResult<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}

/// Factory trait for creating backend instances.
#[async_trait]
pub trait StoreBackendBuilder {
    type Backend: StoreBackend;

    async fn build(self) -> DocumentStoreResult<Self::Backend>;
}
