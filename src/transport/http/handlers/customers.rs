use crate::domain::model::{Customer, CustomerInput, CustomerModel, MessageResponse};
use crate::storage::document::Document;
use crate::transport::http::error::ApiError;
use crate::transport::http::handlers::common::{self, JsonBody};
use crate::transport::http::types::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

#[utoipa::path(
    post,
    path = "/customers",
    tag = "Customers",
    request_body = CustomerInput,
    responses(
        (status = 201, description = "Customer created", body = Customer),
        (status = 400, description = "Validation failure or duplicate email", body = MessageResponse)
    )
)]
pub async fn create_customer_handler(
    State(state): State<AppState>,
    body: JsonBody,
) -> Result<(StatusCode, Json<Document>), ApiError> {
    common::create_record(&state, &CustomerModel, body).await
}

#[utoipa::path(
    get,
    path = "/customers",
    tag = "Customers",
    responses(
        (status = 200, description = "Every customer, unpaginated", body = [Customer]),
        (status = 400, description = "Listing failed", body = MessageResponse)
    )
)]
pub async fn list_customers_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Document>>, ApiError> {
    common::list_records(&state, &CustomerModel).await
}

#[utoipa::path(
    get,
    path = "/customers/{id}",
    tag = "Customers",
    params(("id" = String, Path, description = "The customer ID")),
    responses(
        (status = 200, description = "The customer", body = Customer),
        (status = 404, description = "Customer not found", body = MessageResponse),
        (status = 500, description = "Lookup failed (e.g. malformed id)", body = MessageResponse)
    )
)]
pub async fn get_customer_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Document>, ApiError> {
    common::get_record(&state, &CustomerModel, &id).await
}

#[utoipa::path(
    put,
    path = "/customers/{id}",
    tag = "Customers",
    params(("id" = String, Path, description = "The customer ID")),
    request_body = CustomerInput,
    responses(
        (status = 200, description = "The updated customer", body = Customer),
        (status = 400, description = "Bad request. Invalid input data.", body = MessageResponse),
        (status = 404, description = "Customer not found", body = MessageResponse)
    )
)]
pub async fn update_customer_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: JsonBody,
) -> Result<Json<Document>, ApiError> {
    common::update_record(&state, &CustomerModel, &id, body).await
}

#[utoipa::path(
    delete,
    path = "/customers/{id}",
    tag = "Customers",
    params(("id" = String, Path, description = "The customer ID")),
    responses(
        (status = 200, description = "Customer deleted", body = MessageResponse),
        (status = 404, description = "Customer not found", body = MessageResponse),
        (status = 500, description = "Delete failed (e.g. malformed id)", body = MessageResponse)
    )
)]
pub async fn delete_customer_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    common::delete_record(&state, &CustomerModel, &id).await
}
