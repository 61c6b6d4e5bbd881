use crate::app::catalogue_service::CatalogueService;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

/// Shared by every handler. The service (and the store handle inside it) is
/// created once at startup.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<CatalogueService>,
}

impl AppState {
    pub fn new(service: CatalogueService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
