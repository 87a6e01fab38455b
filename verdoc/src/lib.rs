//! Main verdoc crate providing a unified interface for versioned document storage.
//!
//! This crate is the primary entry point for users of the verdoc framework.
//! It re-exports the core types and functionality from the sub-crates and provides
//! convenient access to the available storage backends.
//!
//! # Features
//!
//! - **Type-safe document storage** - Define your data structures with Serde and store
//!   them safely; identities are assigned by the store and immutable afterwards
//! - **Optimistic concurrency** - Documents that implement `VersionedDocument` are
//!   updated through a version-guarded conditional write that detects concurrent
//!   modification instead of silently overwriting it
//! - **Collection bootstrapping** - Ensure a collection exists before first use,
//!   with a seed routine that runs exactly once at creation time
//! - **Multiple backends** - In-memory and MongoDB storage behind one trait
//! - **Flexible querying** - Composable filters, sorting, and a geospatial
//!   proximity query
//!
//! # Quick Start
//!
//! ```ignore
//! use verdoc::{prelude::*, memory::InMemoryStore};
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! pub struct Jedi {
//!     #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
//!     pub id: Option<DocumentId>,
//!     pub name: String,
//!     pub age: i32,
//!     #[serde(default)]
//!     pub version: i64,
//! }
//!
//! impl Document for Jedi {
//!     fn id(&self) -> Option<DocumentId> { self.id }
//!     fn collection_name() -> &'static str { "jedi" }
//! }
//!
//! impl VersionedDocument for Jedi {
//!     fn version(&self) -> i64 { self.version }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Construct the store once at startup and pass it to whatever needs it.
//!     let store = DocumentStore::new(InMemoryStore::new());
//!
//!     // Bootstrap the collection, seeding it on first creation only.
//!     let jedi = store
//!         .ensure_collection_seeded::<Jedi, _, _>(|jedi| async move {
//!             jedi.insert_one(&Jedi {
//!                 id: None,
//!                 name: "Luke".to_string(),
//!                 age: 19,
//!                 version: 0,
//!             })
//!             .await?;
//!             Ok(())
//!         })
//!         .await?;
//!
//!     // Insert assigns the identity; the version starts at 0.
//!     let id = jedi
//!         .insert_one(&Jedi { id: None, name: "Yoda".to_string(), age: 534, version: 0 })
//!         .await?;
//!
//!     // A version-guarded update: matched on identity AND the supplied version,
//!     // advancing the stored version to 1.
//!     let outcome = jedi
//!         .update_one_versioned(
//!             id,
//!             &Jedi { id: None, name: "Yoda".to_string(), age: 1534, version: 0 },
//!         )
//!         .await?;
//!     assert!(outcome.updated);
//!
//!     // Replaying the same update with the stale version is detected, not applied.
//!     let stale = jedi
//!         .update_one_versioned(
//!             id,
//!             &Jedi { id: None, name: "Yoda".to_string(), age: 2534, version: 0 },
//!         )
//!         .await?;
//!     assert!(!stale.updated);
//!
//!     store.shutdown().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Resolving identities from raw tokens
//!
//! Transport layers hand over identities as raw strings (e.g. path parameters).
//! [`DocumentId::resolve`](document::DocumentId::resolve) parses them, yielding
//! `None` for malformed tokens so that "invalid identity" and "no such document"
//! are indistinguishable to clients:
//!
//! ```ignore
//! let found = match DocumentId::resolve(token) {
//!     Some(id) => jedi.find_by_id(id).await?,
//!     None => None,
//! };
//! ```
//!
//! # Backends
//!
//! - [`memory`] - Fast in-memory storage for development and testing
//! - [`mongodb`] - Persistent MongoDB backend (requires `mongodb` feature)

pub mod prelude;

pub use verdoc_core::{backend, collection, document, error, geo, query, store};

// Re-export BSON types for convenience
pub use bson;

/// In-memory storage backend implementations.
pub mod memory {
    pub use verdoc_memory::{InMemoryStore, InMemoryStoreBuilder};
}

/// MongoDB storage backend implementations.
///
/// This module is only available when the `mongodb` feature is enabled.
#[cfg(feature = "mongodb")]
pub mod mongodb {
    pub use verdoc_mongodb::{MongoDbStore, MongoDbStoreBuilder};
}
