pub mod error;
pub mod router;
pub mod types;
pub mod handlers {
    pub mod common;
    pub mod customers;
    pub mod health;
    pub mod orders;
    pub mod products;
}

pub use error::ApiError;
pub use router::{api_doc, create_app, create_router, ApiDoc};
pub use types::AppState;
