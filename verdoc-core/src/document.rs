//! Core traits and types for document representation, identity, and serialization.
//!
//! This module provides the fundamental traits that all stored documents must implement,
//! the store-assigned [`DocumentId`] identity type, and utilities for converting
//! documents between formats (BSON, JSON).

use bson::{Bson, Uuid, de::deserialize_from_bson, ser::serialize_to_bson};
use serde::{Deserialize, Serialize};
use serde_json::{Value, from_value, to_value};
use std::fmt;

use crate::error::DocumentStoreResult;

/// Reserved field name under which a document's identity is persisted.
pub const ID_FIELD: &str = "_id";

/// Reserved field name under which a versioned document's version counter is persisted.
pub const VERSION_FIELD: &str = "version";

/// The unique, store-assigned, immutable identity of a stored document.
///
/// Identities are generated by the storage backend when a document is first
/// inserted and never change afterwards. They are persisted under the reserved
/// [`ID_FIELD`] key.
///
/// # Token resolution
///
/// Raw string tokens (e.g. path parameters) are turned into identities with
/// [`DocumentId::resolve`]. A malformed token yields `None` rather than an
/// error, so callers treat "invalid token" and "no such document" identically.
///
/// # Example
///
/// ```ignore
/// use verdoc::document::DocumentId;
///
/// let id = DocumentId::new();
/// let token = id.to_string();
///
/// assert_eq!(DocumentId::resolve(&token), Some(id));
/// assert_eq!(DocumentId::resolve("not-a-valid-id"), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(Uuid);

impl DocumentId {
    /// Generates a fresh random identity.
    ///
    /// Intended for storage backends assigning identities at insert time;
    /// application code normally never constructs identities itself.
    pub fn new() -> Self {
        Self(Uuid::new())
    }

    /// Resolves a raw string token into an identity.
    ///
    /// Accepts the hexadecimal UUID formats the store persists. Returns `None`
    /// for any malformed or empty token; resolution never fails with an error.
    pub fn resolve(token: &str) -> Option<Self> {
        uuid::Uuid::parse_str(token)
            .ok()
            .map(|uuid| Self(Uuid::from(uuid)))
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for DocumentId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<DocumentId> for Bson {
    fn from(id: DocumentId) -> Self {
        id.0.into()
    }
}

/// Core trait that all documents stored in a document store must implement.
///
/// This trait defines the minimal interface required for a type to be used as a
/// document: an optional identity and the name of the collection it belongs to.
/// The identity is `None` for documents that have not been persisted yet; the
/// store assigns one on insert and any client-supplied identity is ignored on
/// writes.
///
/// Entity types declare their identity field renamed to the reserved
/// [`ID_FIELD`] so that reads round-trip the stored identity:
///
/// # Example
///
/// ```ignore
/// use verdoc::document::{Document, DocumentId};
/// use serde::{Serialize, Deserialize};
///
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// pub struct Jedi {
///     #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
///     pub id: Option<DocumentId>,
///     pub name: String,
///     pub age: i32,
/// }
///
/// impl Document for Jedi {
///     fn id(&self) -> Option<DocumentId> {
///         self.id
///     }
///
///     fn collection_name() -> &'static str {
///         "jedi"
///     }
/// }
/// ```
pub trait Document: Serialize + for<'de> Deserialize<'de> + Send + Sync + Clone + 'static {
    /// Returns this document's identity, if it has been persisted.
    fn id(&self) -> Option<DocumentId>;

    /// Returns the name of the collection this document belongs to.
    ///
    /// This should be a static, lowercase identifier (e.g., "jedi", "places").
    fn collection_name() -> &'static str;
}

/// Compile-time capability marker for documents protected by optimistic concurrency.
///
/// Implementing this trait declares that every stored instance of the type
/// carries a version counter under the reserved [`VERSION_FIELD`]. The counter
/// starts at 0 on first write and is advanced by exactly 1 on each successful
/// conditional update. Conditional updates are only available for types that
/// implement this trait; types that opt out simply implement [`Document`] alone
/// and are updated matched on identity only.
///
/// The version returned here is the value the caller last observed, i.e. the
/// optimistic lock token validated against the stored document at write time.
pub trait VersionedDocument: Document {
    /// Returns the version the caller believes is currently stored.
    fn version(&self) -> i64;
}

/// Extension trait providing serialization/deserialization utilities for documents.
///
/// This trait is automatically implemented for all types that implement [`Document`].
pub trait DocumentExt: Document {
    /// Converts this document to a BSON value for storage.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn to_bson(&self) -> DocumentStoreResult<Bson>;

    /// Creates a document from a BSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails or the structure is invalid.
    fn from_bson(bson: Bson) -> DocumentStoreResult<Self>;

    /// Converts this document to a JSON value for transport.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn to_json(&self) -> DocumentStoreResult<Value>;

    /// Creates a document from a JSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails or the structure is invalid.
    fn from_json(value: Value) -> DocumentStoreResult<Self>;
}

impl<D: Document> DocumentExt for D {
    fn to_bson(&self) -> DocumentStoreResult<Bson> {
        Ok(serialize_to_bson(self)?)
    }

    fn from_bson(bson: Bson) -> DocumentStoreResult<Self> {
        Ok(deserialize_from_bson(bson)?)
    }

    fn to_json(&self) -> DocumentStoreResult<Value> {
        Ok(to_value(self)?)
    }

    fn from_json(value: Value) -> DocumentStoreResult<Self> {
        Ok(from_value(value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_round_trips_generated_ids() {
        let id = DocumentId::new();
        assert_eq!(DocumentId::resolve(&id.to_string()), Some(id));
    }

    #[test]
    fn resolve_rejects_malformed_tokens() {
        assert_eq!(DocumentId::resolve(""), None);
        assert_eq!(DocumentId::resolve("invalid"), None);
        assert_eq!(DocumentId::resolve("123"), None);
        // Right length, not hexadecimal.
        assert_eq!(DocumentId::resolve("zzzzzzzz-zzzz-zzzz-zzzz-zzzzzzzzzzzz"), None);
    }

    #[test]
    fn resolve_accepts_simple_hex_form() {
        let id = DocumentId::new();
        let simple = id.to_string().replace('-', "");
        assert_eq!(DocumentId::resolve(&simple), Some(id));
    }
}
