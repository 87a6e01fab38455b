use async_trait::async_trait;
use bson::{Bson, Document, doc};
use futures::TryStreamExt;
use mongodb::{
    Client, Collection as MongoCollection, IndexModel,
    options::{ClientOptions, FindOptions, IndexOptions},
};
use tracing::debug;
use verdoc_core::{
    backend::{IndexKind, IndexSpec, StoreBackend, StoreBackendBuilder},
    document::{DocumentId, ID_FIELD},
    error::{DocumentStoreError, DocumentStoreResult},
    query::{Expr, Query, QueryVisitor, SortDirection},
};

use crate::{query::MongoQueryTranslator, sanitizer::ValueSanitizer};


#[derive(Debug)]
pub struct MongoDbStore {
    client: Client,
    database: String,
}

impl MongoDbStore {
    pub fn new(client: Client, database: String) -> Self {
        Self { client, database }
    }

    pub fn builder(dsn: &str, database: &str) -> MongoDbStoreBuilder {
        MongoDbStoreBuilder::new(dsn, database)
    }

    fn get_collection(&self, collection_name: &str) -> MongoCollection<Document> {
        self.client
            .database(&self.database)
            .collection(&ValueSanitizer::sanitize_string(collection_name))
    }

    fn prepare_document(&self, id: DocumentId, document: &Bson) -> DocumentStoreResult<Document> {
        Ok(Document::from_iter(
            ValueSanitizer::sanitize_value(document)
                .as_document()
                .cloned()
                .ok_or_else(|| DocumentStoreError::InvalidDocument("Expected document".into()))?
                .into_iter()
                .chain(vec![(ID_FIELD.to_string(), id.into())]),
        ))
    }

    fn restore_document(&self, document: &Document) -> DocumentStoreResult<Bson> {
        Ok(ValueSanitizer::restore_value(&Bson::Document(document.clone())))
    }

    async fn shutdown(self) -> DocumentStoreResult<()> {
        self.client.shutdown().await;

        Ok(())
    }
}

#[async_trait]
impl StoreBackend for MongoDbStore {
    async fn insert_documents(
        &self,
        documents: Vec<Bson>,
        collection: &str,
    ) -> DocumentStoreResult<Vec<DocumentId>> {
        let assigned = documents
            .iter()
            .map(|_| DocumentId::new())
            .collect::<Vec<_>>();

        self.get_collection(collection)
            .insert_many(
                assigned
                    .iter()
                    .zip(documents.iter())
                    .map(|(id, doc)| self.prepare_document(*id, doc))
                    .collect::<DocumentStoreResult<Vec<Document>>>()?,
            )
            .await
            .map_err(|e| DocumentStoreError::Backend(e.to_string()))?;

        Ok(assigned)
    }

    async fn find_document(
        &self,
        id: DocumentId,
        collection: &str,
    ) -> DocumentStoreResult<Option<Bson>> {
        self.get_collection(collection)
            .find_one(doc! { ID_FIELD: id.as_uuid() })
            .await
            .map_err(|e| DocumentStoreError::Backend(e.to_string()))?
            .map(|doc| self.restore_document(&doc))
            .transpose()
    }

    async fn query_documents(
        &self,
        query: Query,
        collection: &str,
    ) -> DocumentStoreResult<Vec<Bson>> {
        let mut options = FindOptions::default();

        if let Some(limit) = query.limit {
            options.limit = Some(limit as i64);
        }
        if let Some(skip) = query.offset {
            options.skip = Some(skip as u64);
        }
        if let Some(sort) = &query.sort {
            options.sort = Some(doc! {
                sort.field.clone(): match sort.direction {
                    SortDirection::Asc => 1,
                    SortDirection::Desc => -1,
                }
            })
        }

        Ok(
            self.get_collection(collection)
                .find(
                    if let Some(expr) = &query.filter {
                        MongoQueryTranslator.visit_expr(expr)?
                    } else {
                        doc! {}
                    },
                )
                .with_options(options)
                .await
                .map_err(|e| DocumentStoreError::Backend(e.to_string()))?
                .try_collect::<Vec<Document>>()
                .await
                .map_err(|e| DocumentStoreError::Backend(e.to_string()))?
                .into_iter()
                .map(|doc| self.restore_document(&doc))
                .collect::<DocumentStoreResult<Vec<Bson>>>()?
        )
    }

    async fn update_one(
        &self,
        filter: Expr,
        set: Document,
        collection: &str,
    ) -> DocumentStoreResult<u64> {
        // The server evaluates the filter and applies the $set atomically.
        let result = self.get_collection(collection)
            .update_one(
                MongoQueryTranslator.visit_expr(&filter)?,
                doc! {
                    "$set": ValueSanitizer::sanitize_value(&Bson::Document(set))
                        .as_document()
                        .cloned()
                        .ok_or_else(|| DocumentStoreError::InvalidDocument("Expected document".into()))?
                },
            )
            .await
            .map_err(|e| DocumentStoreError::Backend(e.to_string()))?;

        Ok(result.modified_count)
    }

    async fn delete_documents(
        &self,
        ids: Vec<DocumentId>,
        collection: &str,
    ) -> DocumentStoreResult<u64> {
        let result = self.get_collection(collection)
            .delete_many(doc! {
                ID_FIELD: {
                    "$in": ids
                        .into_iter()
                        .map(|id| id.as_uuid())
                        .collect::<Vec<_>>()
                }
            })
            .await
            .map_err(|e| DocumentStoreError::Backend(e.to_string()))?;

        Ok(result.deleted_count)
    }

    async fn create_collection(&self, name: &str) -> DocumentStoreResult<()> {
        self.client
            .database(&self.database)
            .create_collection(&ValueSanitizer::sanitize_string(name))
            .await
            .map_err(|e| DocumentStoreError::Backend(e.to_string()))?;

        debug!(collection = name, "collection created");

        Ok(())
    }

    async fn drop_collection(&self, name: &str) -> DocumentStoreResult<()> {
        self.get_collection(name)
            .drop()
            .await
            .map_err(|e| DocumentStoreError::Backend(e.to_string()))?;

        Ok(())
    }

    async fn list_collections(&self) -> DocumentStoreResult<Vec<String>> {
        Ok(
            self.client
                .database(&self.database)
                .list_collection_names()
                .await
                .map_err(|e| DocumentStoreError::Backend(e.to_string()))?
                .into_iter()
                .map(|name| ValueSanitizer::restore_string(&name))
                .collect()
        )
    }

    async fn add_index(
        &self,
        collection: &str,
        field: &str,
        kind: IndexKind,
    ) -> DocumentStoreResult<()> {
        let model = match kind {
            IndexKind::Value { unique } => IndexModel::builder()
                .keys(doc! { field: 1 })
                .options(
                    IndexOptions::builder()
                        .unique(unique)
                        .build()
                )
                .build(),
            IndexKind::Geo2dSphere => IndexModel::builder()
                .keys(doc! { field: "2dsphere" })
                .build(),
        };

        self.get_collection(collection)
            .create_index(model)
            .await
            .map_err(|e| DocumentStoreError::Backend(e.to_string()))?;

        debug!(collection, field, "index created");

        Ok(())
    }

    async fn list_indexes(&self, collection: &str) -> DocumentStoreResult<Vec<IndexSpec>> {
        Ok(
            self.get_collection(collection)
                .list_indexes()
                .await
                .map_err(|e| DocumentStoreError::Backend(e.to_string()))?
                .try_collect::<Vec<IndexModel>>()
                .await
                .map_err(|e| DocumentStoreError::Backend(e.to_string()))?
                .into_iter()
                .filter_map(|model| {
                    let (field, key) = model.keys.iter().next()?;

                    // The implicit identity index is driver bookkeeping, not ours.
                    if field == ID_FIELD {
                        return None;
                    }

                    let kind = match key {
                        Bson::String(kind) if kind == "2dsphere" => IndexKind::Geo2dSphere,
                        _ => IndexKind::Value {
                            unique: model
                                .options
                                .as_ref()
                                .and_then(|options| options.unique)
                                .unwrap_or(false),
                        },
                    };

                    Some(IndexSpec { field: field.clone(), kind })
                })
                .collect()
        )
    }

    async fn shutdown(self) -> DocumentStoreResult<()> {
        self.shutdown().await
    }
}

pub struct MongoDbStoreBuilder {
    dsn: String,
    database: String,
}

impl MongoDbStoreBuilder {
    pub fn new(dsn: &str, database: &str) -> Self {
        Self {
            dsn: dsn.to_string(),
            database: database.to_string(),
        }
    }
}

#[async_trait]
impl StoreBackendBuilder for MongoDbStoreBuilder {
    type Backend = MongoDbStore;

    async fn build(self) -> DocumentStoreResult<Self::Backend> {
        Ok(MongoDbStore::new(
            Client::with_options(
                ClientOptions::parse(&self.dsn)
                    .await
                    .map_err(|e| DocumentStoreError::Initialization(e.to_string()))?,
            )
            .map_err(|e| DocumentStoreError::Initialization(e.to_string()))?,
            self.database,
        ))
    }
}
