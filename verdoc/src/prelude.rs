//! Convenient re-exports of commonly used types from verdoc.
//!
//! Import this prelude module to quickly access the most frequently used types
//! and traits without needing to import from multiple sub-modules:
//!
//! ```ignore
//! use verdoc::prelude::*;
//! ```
//!
//! This provides access to:
//! - Document traits and the identity type
//! - Store backends and builders
//! - Query construction and filtering
//! - Collection interfaces and update outcomes
//! - Error types

pub use verdoc_core::{
    backend::{IndexKind, IndexSpec, StoreBackend, StoreBackendBuilder},
    collection::{TypedCollection, UpdateOutcome},
    document::{Document, DocumentExt, DocumentId, VersionedDocument},
    error::{DocumentStoreError, DocumentStoreResult},
    geo::GeoPoint,
    query::{Expr, FieldOp, Filter, Query, QueryBuilder, QueryVisitor, Sort, SortDirection},
    store::DocumentStore,
};
