//! A versioned document collection layer that provides CRUD and optimistic-concurrency
//! primitives over pluggable document stores.
//!
//! This crate is the core of the verdoc project and provides:
//!
//! - **Document traits** ([`document`]) - Core traits for defining documents and their
//!   identity, plus the compile-time marker for versioned documents
//! - **Store backend abstraction** ([`backend`]) - Traits for implementing different
//!   storage backends
//! - **Query and filtering API** ([`query`]) - Type-safe query construction and filtering,
//!   including the geospatial `near` filter
//! - **Geospatial types** ([`geo`]) - GeoJSON point representation and distance math
//! - **Collections interface** ([`collection`]) - High-level API for interacting with
//!   document collections, including the version-checked conditional update
//! - **Document store** ([`store`]) - Main interface for working with typed documents
//!   and bootstrapping collections
//! - **Error handling** ([`error`]) - Error types and result types
//!
//! # Example
//!
//! ```ignore
//! use verdoc::{Document, VersionedDocument, DocumentId};
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
//!     fn id(&self) -> Option<DocumentId> {
//!         self.id
//!     }
//!
//!     fn collection_name() -> &'static str {
//!         "jedi"
//!     }
//! }
//!
//! impl VersionedDocument for Jedi {
//!     fn version(&self) -> i64 {
//!         self.version
//!     }
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as verdoc_core;

pub mod backend;
pub mod collection;
pub mod document;
pub mod error;
pub mod geo;
pub mod query;
pub mod store;
