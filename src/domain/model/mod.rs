//! Domain model definitions for the catalogue resources.

use serde_json::Value as JsonValue;

pub mod entities;
pub mod resources;
pub mod schema;

pub use entities::{
    Customer, CustomerInput, MessageResponse, Order, OrderInput, OrderLine, OrderStatus, Product,
    ProductInput,
};
pub use resources::{all_models, CustomerModel, OrderModel, ProductModel};
pub use schema::{FieldSpec, ValidationError};

use crate::storage::document::{Document, Patch};

/// Contract for any resource served by the catalogue.
///
/// Each model provides:
/// - its display name (used in error messages) and collection name
/// - a declarative field list
/// - validation for full documents (create) and partial bodies (update)
pub trait ResourceModel: Send + Sync {
    /// Singular display name, e.g. `Customer`.
    fn model_name(&self) -> &'static str;

    /// Name of the backing collection, e.g. `customers`.
    fn collection_name(&self) -> &'static str;

    fn fields(&self) -> &'static [FieldSpec];

    /// Top-level fields the store must keep unique across the collection.
    fn unique_fields(&self) -> Vec<&'static str> {
        self.fields()
            .iter()
            .filter(|f| f.unique)
            .map(|f| f.name)
            .collect()
    }

    /// Validates a create payload and returns the document to persist.
    fn validate_create_payload(&self, payload: &JsonValue) -> Result<Document, ValidationError> {
        schema::validate_create(self.model_name(), self.fields(), payload)
    }

    /// Validates the fields present in an update payload.
    fn validate_update_payload(&self, payload: &JsonValue) -> Result<Patch, ValidationError> {
        schema::validate_update(self.model_name(), self.fields(), payload)
    }
}
