//! In-memory document storage backend for verdoc.
//!
//! This crate provides a thread-safe, in-memory implementation of the `StoreBackend`
//! trait. It uses async-aware read-write locks for concurrent access and is ideal for
//! development and testing.
//!
//! # Features
//!
//! - **Thread-safe access** - Concurrent reads and writes using async-aware RwLock
//! - **Type-erased storage** - Stores documents as BSON for flexibility
//! - **Atomic conditional updates** - The filter match and the write happen under a
//!   single write guard, so optimistic-concurrency checks behave exactly as they do
//!   against a real store
//! - **Full query support** - Filtering (including geospatial proximity), sorting,
//!   and pagination
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
//! }
//!
//! impl Document for Jedi {
//!     fn id(&self) -> Option<DocumentId> { self.id }
//!     fn collection_name() -> &'static str { "jedi" }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = DocumentStore::new(InMemoryStore::new());
//!     let jedi = store.ensure_collection::<Jedi>().await?;
//!
//!     let id = jedi.insert_one(&Jedi { id: None, name: "Luke".into(), age: 19 }).await?;
//!     assert!(jedi.find_by_id(id).await?.is_some());
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as verdoc_memory;

pub mod store;
pub mod evaluator;

pub use store::{InMemoryStore, InMemoryStoreBuilder};
