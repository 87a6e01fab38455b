//! Main document store interface for interacting with document backends.
//!
//! [`DocumentStore`] owns the backend handle. It is constructed once at
//! process startup and passed explicitly to whatever needs it; there is no
//! ambient, lazily-initialized global handle. Collection handles borrow the
//! store and are obtained via [`typed_collection`](DocumentStore::typed_collection)
//! or the bootstrap methods below.
//!
//! # Bootstrapping
//!
//! [`ensure_collection`](DocumentStore::ensure_collection) and
//! [`ensure_collection_seeded`](DocumentStore::ensure_collection_seeded)
//! guarantee a collection exists before first use. When the collection is
//! absent it is created, and the optional seed routine (index creation,
//! sample rows) runs exactly once against the fresh collection before the
//! handle is returned. When it is already present the handle is returned
//! as-is and the seed routine is skipped. The existence check and the
//! creation are not a single atomic compare-and-create: two concurrent
//! first-time calls for the same name can both observe "absent". That race
//! is confined to process startup and left to the store to reject or
//! deduplicate.
//!
//! # Example
//!
//! ```ignore
//! let store = DocumentStore::new(backend);
//! let jedi = store
//!     .ensure_collection_seeded(|jedi| async move {
//!         jedi.insert_one(&Jedi { id: None, name: "Luke".into(), age: 19, version: 0 })
//!             .await?;
//!         Ok(())
//!     })
//!     .await?;
//! ```

use std::future::Future;
use tracing::debug;

use crate::{
    backend::{IndexKind, IndexSpec, StoreBackend},
    collection::TypedCollection,
    document::Document,
    error::DocumentStoreResult,
};

/// A strongly-typed document store bound to a specific backend implementation.
///
/// # Type Parameters
///
/// * `B` - The backend implementation type
#[derive(Debug)]
pub struct DocumentStore<B: StoreBackend> {
    backend: B,
}

impl<B: StoreBackend> DocumentStore<B> {
    /// Creates a new document store with the given backend.
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Gets a typed collection for the specified document type.
    ///
    /// The collection name is determined by the document type's
    /// `collection_name()` method. No existence check is performed; use
    /// [`ensure_collection`](DocumentStore::ensure_collection) to bootstrap.
    pub fn typed_collection<'a, D: Document>(&'a self) -> TypedCollection<'a, B, D> {
        TypedCollection::new(D::collection_name().to_string(), &self.backend)
    }

    /// Ensures the collection for `D` exists, creating it if absent.
    ///
    /// Idempotent with respect to collection existence: calling it any number
    /// of times yields a handle to the collection created once.
    ///
    /// # Errors
    ///
    /// Propagates the backend error if the existence check or creation fails;
    /// a partially created collection is not rolled back.
    pub async fn ensure_collection<'a, D: Document>(
        &'a self,
    ) -> DocumentStoreResult<TypedCollection<'a, B, D>> {
        let name = D::collection_name();

        if !self.collection_exists(name).await? {
            self.backend.create_collection(name).await?;
            debug!(collection = name, "collection created");
        }

        Ok(self.typed_collection::<D>())
    }

    /// Ensures the collection for `D` exists, running `seed` exactly once at
    /// creation time.
    ///
    /// When the collection is absent it is created and `seed` is invoked with
    /// a handle to the fresh collection (e.g. to create a geospatial index or
    /// insert sample rows) before this method returns. When the collection is
    /// already present the seed routine is skipped, so within a process the
    /// seed runs at most once per collection name unless the collection is
    /// externally dropped.
    ///
    /// # Errors
    ///
    /// Propagates the backend error if creation fails, and the seed routine's
    /// error if it fails; neither rolls back the created collection.
    pub async fn ensure_collection_seeded<'a, D, F, Fut>(
        &'a self,
        seed: F,
    ) -> DocumentStoreResult<TypedCollection<'a, B, D>>
    where
        D: Document,
        F: FnOnce(TypedCollection<'a, B, D>) -> Fut,
        Fut: Future<Output = DocumentStoreResult<()>>,
    {
        let name = D::collection_name();

        if !self.collection_exists(name).await? {
            self.backend.create_collection(name).await?;
            debug!(collection = name, "collection created");

            seed(self.typed_collection::<D>()).await?;
            debug!(collection = name, "collection seeded");
        }

        Ok(self.typed_collection::<D>())
    }

    /// Checks whether a collection with the given name exists in the catalog.
    pub async fn collection_exists(&self, name: &str) -> DocumentStoreResult<bool> {
        Ok(self
            .list_collections()
            .await?
            .iter()
            .any(|existing| existing == name))
    }

    /// Creates a new collection with the given name.
    ///
    /// # Errors
    ///
    /// Returns an error if creation fails.
    pub async fn create_collection(&self, name: &str) -> DocumentStoreResult<()> {
        self.backend
            .create_collection(name)
            .await
    }

    /// Drops (deletes) a collection with the given name.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection does not exist or deletion fails.
    pub async fn drop_collection(&self, name: &str) -> DocumentStoreResult<()> {
        self.backend.drop_collection(name).await
    }

    /// Lists all collections in the store.
    pub async fn list_collections(&self) -> DocumentStoreResult<Vec<String>> {
        self.backend.list_collections().await
    }

    /// Adds an index to a field in a collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the operation fails.
    pub async fn add_index(
        &self,
        collection: &str,
        field: &str,
        kind: IndexKind,
    ) -> DocumentStoreResult<()> {
        self.backend
            .add_index(collection, field, kind)
            .await
    }

    /// Lists the indexes created on a collection.
    pub async fn list_indexes(&self, collection: &str) -> DocumentStoreResult<Vec<IndexSpec>> {
        self.backend.list_indexes(collection).await
    }

    /// Shuts down the store and releases backend resources.
    ///
    /// This consumes the store and should be called when no longer needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the shutdown operation fails.
    pub async fn shutdown(self) -> DocumentStoreResult<()> {
        self.backend.shutdown().await?;

        Ok(())
    }
}
