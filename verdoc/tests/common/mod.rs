#![allow(dead_code)]

use serde::{Deserialize, Serialize};
use verdoc::memory::InMemoryStore;
use verdoc::prelude::*;

/// A versioned entity: every update goes through the version-guarded path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Jedi {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<DocumentId>,
    pub name: String,
    pub age: i32,
    #[serde(default)]
    pub version: i64,
}

impl Jedi {
    pub fn new(name: &str, age: i32, version: i64) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            age,
            version,
        }
    }
}

impl Document for Jedi {
    fn id(&self) -> Option<DocumentId> {
        self.id
    }

    fn collection_name() -> &'static str {
        "jedi"
    }
}

impl VersionedDocument for Jedi {
    fn version(&self) -> i64 {
        self.version
    }
}

/// An entity that opts out of optimistic concurrency: no version field,
/// updates are matched on identity alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Droid {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<DocumentId>,
    pub designation: String,
}

impl Droid {
    pub fn new(designation: &str) -> Self {
        Self {
            id: None,
            designation: designation.to_string(),
        }
    }
}

impl Document for Droid {
    fn id(&self) -> Option<DocumentId> {
        self.id
    }

    fn collection_name() -> &'static str {
        "droids"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Category {
    Parks,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<DocumentId>,
    pub name: String,
    pub location: GeoPoint,
    pub category: Category,
}

impl Place {
    pub fn park(name: &str, longitude: f64, latitude: f64) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            location: GeoPoint::new(longitude, latitude),
            category: Category::Parks,
        }
    }
}

impl Document for Place {
    fn id(&self) -> Option<DocumentId> {
        self.id
    }

    fn collection_name() -> &'static str {
        "places"
    }
}

pub fn store() -> DocumentStore<InMemoryStore> {
    DocumentStore::new(InMemoryStore::new())
}
