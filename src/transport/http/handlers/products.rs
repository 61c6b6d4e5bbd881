use crate::domain::model::{MessageResponse, Product, ProductInput, ProductModel};
use crate::storage::document::Document;
use crate::transport::http::error::ApiError;
use crate::transport::http::handlers::common::{self, JsonBody};
use crate::transport::http::types::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

#[utoipa::path(
    post,
    path = "/products",
    tag = "Products",
    request_body = ProductInput,
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, description = "Bad request. Invalid input data.", body = MessageResponse)
    )
)]
pub async fn create_product_handler(
    State(state): State<AppState>,
    body: JsonBody,
) -> Result<(StatusCode, Json<Document>), ApiError> {
    common::create_record(&state, &ProductModel, body).await
}

/// Retrieve a list of products.
#[utoipa::path(
    get,
    path = "/products",
    tag = "Products",
    responses(
        (status = 200, description = "Every product, unpaginated", body = [Product]),
        (status = 400, description = "Listing failed", body = MessageResponse)
    )
)]
pub async fn list_products_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Document>>, ApiError> {
    common::list_records(&state, &ProductModel).await
}

#[utoipa::path(
    get,
    path = "/products/{id}",
    tag = "Products",
    params(("id" = String, Path, description = "The product ID")),
    responses(
        (status = 200, description = "The product", body = Product),
        (status = 404, description = "Product not found", body = MessageResponse),
        (status = 500, description = "Lookup failed (e.g. malformed id)", body = MessageResponse)
    )
)]
pub async fn get_product_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Document>, ApiError> {
    common::get_record(&state, &ProductModel, &id).await
}

#[utoipa::path(
    put,
    path = "/products/{id}",
    tag = "Products",
    params(("id" = String, Path, description = "The product ID")),
    request_body = ProductInput,
    responses(
        (status = 200, description = "The updated product", body = Product),
        (status = 400, description = "Bad request. Invalid input data.", body = MessageResponse),
        (status = 404, description = "Product not found", body = MessageResponse)
    )
)]
pub async fn update_product_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: JsonBody,
) -> Result<Json<Document>, ApiError> {
    common::update_record(&state, &ProductModel, &id, body).await
}

#[utoipa::path(
    delete,
    path = "/products/{id}",
    tag = "Products",
    params(("id" = String, Path, description = "The product ID")),
    responses(
        (status = 200, description = "Product deleted", body = MessageResponse),
        (status = 404, description = "Product not found", body = MessageResponse),
        (status = 500, description = "Delete failed (e.g. malformed id)", body = MessageResponse)
    )
)]
pub async fn delete_product_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    common::delete_record(&state, &ProductModel, &id).await
}
