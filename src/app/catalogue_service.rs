//! The catalogue service.
//!
//! Sits between the HTTP handlers and the document store. It is responsible for:
//! 1.  Opening the process-wide store once and making sure every collection exists.
//! 2.  Running the per-resource validation before every write.
//! 3.  Issuing exactly one store call per operation and reporting absence as `NotFound`.
//!
//! References between resources (`customerID`, `productID`) are never looked up.

use crate::domain::model::{all_models, ResourceModel, ValidationError};
use crate::domain::object_id::ObjectId;
use crate::infra::config::{Config, StoreBackend};
use crate::storage::document::{
    Document, DocumentStore, MemoryDocumentStore, PgDocumentStore, StoreError,
};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Cast to ObjectId failed for value \"{value}\" (type string) at path \"_id\" for model \"{model}\"")]
    InvalidId { model: &'static str, value: String },

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct CatalogueService {
    store: Arc<dyn DocumentStore>,
}

impl CatalogueService {
    /// Opens the store selected by `config` and initializes the collections.
    pub async fn connect(config: &Config) -> anyhow::Result<Self> {
        let store: Arc<dyn DocumentStore> = match config.store_backend {
            StoreBackend::Postgres => {
                tracing::info!(max_connections = config.db_max_connections, "connecting to Postgres");
                Arc::new(
                    PgDocumentStore::connect(config.database_url()?, config.db_max_connections)
                        .await?,
                )
            }
            StoreBackend::Memory => {
                tracing::warn!("using the in-memory store; data is lost on restart");
                Arc::new(MemoryDocumentStore::new())
            }
        };
        Ok(Self::with_store(store).await?)
    }

    /// Wraps an existing store, creating any missing collections.
    pub async fn with_store(store: Arc<dyn DocumentStore>) -> Result<Self, StoreError> {
        for model in all_models() {
            store
                .ensure_collection(model.collection_name(), &model.unique_fields())
                .await?;
            tracing::debug!(collection = model.collection_name(), "collection ready");
        }
        Ok(Self { store })
    }

    pub async fn ping(&self) -> Result<(), StoreError> {
        self.store.ping().await
    }

    fn parse_id(model: &dyn ResourceModel, id: &str) -> Result<ObjectId, ServiceError> {
        ObjectId::parse_str(id).map_err(|_| ServiceError::InvalidId {
            model: model.model_name(),
            value: id.to_string(),
        })
    }

    pub async fn create(
        &self,
        model: &dyn ResourceModel,
        body: &JsonValue,
    ) -> Result<Document, ServiceError> {
        let doc = model.validate_create_payload(body)?;
        Ok(self.store.insert(model.collection_name(), doc).await?)
    }

    pub async fn get(&self, model: &dyn ResourceModel, id: &str) -> Result<Document, ServiceError> {
        let id = Self::parse_id(model, id)?;
        self.store
            .find_by_id(model.collection_name(), &id)
            .await?
            .ok_or(ServiceError::NotFound(model.model_name()))
    }

    /// The full collection; no paging.
    pub async fn list(&self, model: &dyn ResourceModel) -> Result<Vec<Document>, ServiceError> {
        Ok(self.store.find_all(model.collection_name()).await?)
    }

    /// Validates the submitted fields and merges them over the stored record.
    pub async fn update(
        &self,
        model: &dyn ResourceModel,
        id: &str,
        body: &JsonValue,
    ) -> Result<Document, ServiceError> {
        let id = Self::parse_id(model, id)?;
        let patch = model.validate_update_payload(body)?;
        self.store
            .update_by_id(model.collection_name(), &id, patch)
            .await?
            .ok_or(ServiceError::NotFound(model.model_name()))
    }

    pub async fn delete(
        &self,
        model: &dyn ResourceModel,
        id: &str,
    ) -> Result<Document, ServiceError> {
        let id = Self::parse_id(model, id)?;
        self.store
            .delete_by_id(model.collection_name(), &id)
            .await?
            .ok_or(ServiceError::NotFound(model.model_name()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{CustomerModel, OrderModel, ProductModel};
    use serde_json::json;

    async fn service() -> CatalogueService {
        CatalogueService::with_store(Arc::new(MemoryDocumentStore::new()))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn malformed_ids_are_cast_errors() {
        let svc = service().await;
        let err = svc.get(&ProductModel, "not-an-id").await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidId { model: "Product", .. }));
        assert_eq!(
            err.to_string(),
            "Cast to ObjectId failed for value \"not-an-id\" (type string) at path \"_id\" for model \"Product\""
        );
    }

    #[tokio::test]
    async fn missing_records_are_not_found() {
        let svc = service().await;
        let id = ObjectId::new().to_hex();
        for model in all_models() {
            let err = svc.get(model, &id).await.unwrap_err();
            assert_eq!(err.to_string(), format!("{} not found", model.model_name()));
        }
        let err = svc
            .update(&CustomerModel, &id, &json!({"firstName": "A"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound("Customer")));
    }

    #[tokio::test]
    async fn orders_keep_dangling_references() {
        let svc = service().await;
        let order = svc
            .create(
                &OrderModel,
                &json!({
                    "customerID": ObjectId::new().to_hex(),
                    "products": [{"productID": ObjectId::new().to_hex(), "quantity": 3}],
                    "total": 0.5
                }),
            )
            .await
            .unwrap();
        assert_eq!(order["total"], json!(0.5));
        assert_eq!(order["status"], json!("pending"));
    }

    #[tokio::test]
    async fn update_merges_and_revalidates() {
        let svc = service().await;
        let created = svc
            .create(
                &ProductModel,
                &json!({"name": "Frosted Flakes", "manufacturer": "Kellogs", "price": 5.99}),
            )
            .await
            .unwrap();
        let id = created["_id"].as_str().unwrap().to_string();

        let updated = svc
            .update(&ProductModel, &id, &json!({"price": "6.49"}))
            .await
            .unwrap();
        assert_eq!(updated["price"], json!(6.49));
        assert_eq!(updated["name"], json!("Frosted Flakes"));

        let err = svc
            .update(&ProductModel, &id, &json!({"price": "cheap"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }
}
