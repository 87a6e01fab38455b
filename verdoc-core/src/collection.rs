//! Collection types for document store operations.
//!
//! This module provides the typed collection abstraction used to work with the
//! documents of one collection: identity-assigning insertion, lookup, filtered
//! queries, counted deletion, and the conditional update protocol behind
//! optimistic concurrency.
//!
//! # Updates
//!
//! Updates are field-level: the document is serialized to its field map, the
//! reserved identity field is stripped (identity is the match key, never part
//! of the update set), and every remaining field is written onto the stored
//! document. Which match condition is used depends on the document type:
//!
//! - [`TypedCollection::update_one`] - available for every [`Document`]; the
//!   update is matched on identity alone.
//! - [`TypedCollection::update_one_versioned`] - only available when the type
//!   implements [`VersionedDocument`]; the update is matched on identity AND
//!   the version the caller supplied, and advances the stored version by one.
//!
//! Both report an [`UpdateOutcome`] rather than an error when nothing matched.

use bson::{Bson, Document as BsonDocument};
use std::marker::PhantomData;

use crate::{
    backend::{IndexKind, IndexSpec, StoreBackend},
    document::{Document, DocumentExt, DocumentId, ID_FIELD, VERSION_FIELD, VersionedDocument},
    error::{DocumentStoreError, DocumentStoreResult},
    query::{Filter, Query},
};

/// The result of a conditional update.
///
/// `updated == false` signals that the match condition found nothing: either
/// the identity is absent, or (for versioned documents) the stored version
/// differs from the one the caller supplied. The two cases are deliberately
/// not distinguished here; a caller holding a prior read can tell them apart
/// on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// Whether the update matched and modified a stored document.
    pub updated: bool,
}

/// A type-safe collection bound to a specific document type.
///
/// Obtained from [`DocumentStore`](crate::store::DocumentStore) via
/// `typed_collection` or the `ensure_collection` bootstrap methods. The handle
/// is cheap to clone and borrows the backend, which the caller constructs once
/// at startup and owns for the process lifetime.
///
/// # Type Parameters
///
/// * `'a` - Lifetime of the backend reference
/// * `B` - The storage backend type
/// * `D` - The document type stored in this collection
#[derive(Debug)]
pub struct TypedCollection<'a, B: StoreBackend, D: Document> {
    name: String,
    backend: &'a B,
    _marker: PhantomData<D>,
}

impl<'a, B: StoreBackend, D: Document> Clone for TypedCollection<'a, B, D> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            backend: self.backend,
            _marker: PhantomData,
        }
    }
}

impl<'a, B: StoreBackend, D: Document> TypedCollection<'a, B, D> {
    pub(crate) fn new(name: String, backend: &'a B) -> Self {
        Self { name, backend, _marker: PhantomData }
    }

    /// Returns the name of this collection.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Serializes a document to its stored field map, stripping the reserved
    /// identity field. Whatever identity the caller supplied is ignored on
    /// writes: on insert the store assigns one, and on update the identity is
    /// the match key, not a mutable field.
    fn to_fields(document: &D) -> DocumentStoreResult<BsonDocument> {
        let mut fields = match document.to_bson()? {
            Bson::Document(fields) => fields,
            _ => {
                return Err(DocumentStoreError::InvalidDocument(
                    "Expected document to serialize to a field map".to_string(),
                ));
            }
        };
        fields.remove(ID_FIELD);

        Ok(fields)
    }

    /// Inserts a document and returns the identity the store assigned to it.
    ///
    /// # Errors
    ///
    /// Returns a [`DocumentStoreError`] if serialization or insertion fails.
    pub async fn insert_one(&self, document: &D) -> DocumentStoreResult<DocumentId> {
        self.insert_many(std::slice::from_ref(document))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                DocumentStoreError::Backend("Insert did not return an identity".to_string())
            })
    }

    /// Inserts multiple documents and returns the assigned identities in input order.
    ///
    /// # Errors
    ///
    /// Returns a [`DocumentStoreError`] if serialization or insertion fails.
    pub async fn insert_many(&self, documents: &[D]) -> DocumentStoreResult<Vec<DocumentId>> {
        Ok(self
            .backend
            .insert_documents(
                documents
                    .iter()
                    .map(|d| Self::to_fields(d).map(Bson::Document))
                    .collect::<DocumentStoreResult<Vec<Bson>>>()?,
                self.name(),
            )
            .await?)
    }

    /// Retrieves a document by its identity, or `None` if it is absent.
    ///
    /// # Errors
    ///
    /// Returns a [`DocumentStoreError`] if deserialization or retrieval fails.
    pub async fn find_by_id(&self, id: DocumentId) -> DocumentStoreResult<Option<D>> {
        self.backend
            .find_document(id, self.name())
            .await?
            .map(D::from_bson)
            .transpose()
    }

    /// Retrieves every document in the collection (unrestricted scan).
    ///
    /// # Errors
    ///
    /// Returns a [`DocumentStoreError`] if deserialization or the scan fails.
    pub async fn find_all(&self) -> DocumentStoreResult<Vec<D>> {
        self.query(Query::new()).await
    }

    /// Queries documents in the collection using a structured query.
    ///
    /// # Errors
    ///
    /// Returns a [`DocumentStoreError`] if deserialization or the query fails.
    pub async fn query(&self, query: Query) -> DocumentStoreResult<Vec<D>> {
        self.backend
            .query_documents(query, self.name())
            .await?
            .into_iter()
            .map(D::from_bson)
            .collect()
    }

    /// Updates the document with the given identity, matched on identity alone.
    ///
    /// Every serialized field except the identity is written onto the stored
    /// document. For document types protected by optimistic concurrency, use
    /// [`update_one_versioned`](TypedCollection::update_one_versioned) instead;
    /// this method performs no version check.
    ///
    /// # Errors
    ///
    /// Returns a [`DocumentStoreError`] if serialization or the update fails.
    /// A non-matching identity is not an error; it is reported through the
    /// returned [`UpdateOutcome`].
    pub async fn update_one(
        &self,
        id: DocumentId,
        document: &D,
    ) -> DocumentStoreResult<UpdateOutcome> {
        let modified = self
            .backend
            .update_one(Filter::id(id), Self::to_fields(document)?, self.name())
            .await?;

        Ok(UpdateOutcome { updated: modified > 0 })
    }

    /// Deletes the document with the given identity, returning the deleted count.
    ///
    /// The count is 0 when the identity was absent and 1 when the document was
    /// removed.
    ///
    /// # Errors
    ///
    /// Returns a [`DocumentStoreError`] if the operation fails.
    pub async fn delete_one(&self, id: DocumentId) -> DocumentStoreResult<u64> {
        Ok(self
            .backend
            .delete_documents(vec![id], self.name())
            .await?)
    }

    /// Creates an index on a field of this collection.
    ///
    /// Typically invoked from a seed routine, e.g. to create the geospatial
    /// index a `near` query needs.
    ///
    /// # Errors
    ///
    /// Returns a [`DocumentStoreError`] if the operation fails.
    pub async fn add_index(&self, field: &str, kind: IndexKind) -> DocumentStoreResult<()> {
        self.backend
            .add_index(self.name(), field, kind)
            .await
    }

    /// Lists the indexes created on this collection.
    pub async fn list_indexes(&self) -> DocumentStoreResult<Vec<IndexSpec>> {
        self.backend.list_indexes(self.name()).await
    }
}

impl<'a, B: StoreBackend, D: VersionedDocument> TypedCollection<'a, B, D> {
    /// Updates the document with the given identity, guarded by its version.
    ///
    /// The version carried by `document` is the one the caller last observed
    /// (the optimistic lock token). The update is matched on identity AND the
    /// stored version equalling that token, and writes every serialized field
    /// except the identity, advancing the version to `token + 1`. The match
    /// and the write are one atomic step at the store, so of two concurrent
    /// updates supplying the same token, at most one succeeds; the loser
    /// observes `updated == false` and must re-fetch before retrying.
    ///
    /// # Errors
    ///
    /// Returns a [`DocumentStoreError`] if serialization or the update fails.
    /// An absent identity and a version mismatch are not errors; both are
    /// reported as `updated == false` in the returned [`UpdateOutcome`].
    pub async fn update_one_versioned(
        &self,
        id: DocumentId,
        document: &D,
    ) -> DocumentStoreResult<UpdateOutcome> {
        let supplied = document.version();

        let mut fields = Self::to_fields(document)?;
        fields.insert(VERSION_FIELD, Bson::Int64(supplied + 1));

        let modified = self
            .backend
            .update_one(
                Filter::id(id).and(Filter::eq(VERSION_FIELD, supplied)),
                fields,
                self.name(),
            )
            .await?;

        Ok(UpdateOutcome { updated: modified > 0 })
    }
}
