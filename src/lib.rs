pub mod app;
pub mod domain;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::catalogue_service::{CatalogueService, ServiceError};
pub use domain::model::{CustomerModel, OrderModel, ProductModel, ResourceModel};
pub use domain::object_id::ObjectId;
pub use infra::config::Config;
pub use storage::document::{DocumentStore, MemoryDocumentStore, PgDocumentStore};
