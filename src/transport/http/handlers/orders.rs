use crate::domain::model::{MessageResponse, Order, OrderInput, OrderModel};
use crate::storage::document::Document;
use crate::transport::http::error::ApiError;
use crate::transport::http::handlers::common::{self, JsonBody};
use crate::transport::http::types::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

/// Create a new order.
///
/// Stores the order as submitted: `customerID`/`productID` are not checked for
/// existence and `total` is not recomputed from the line items.
#[utoipa::path(
    post,
    path = "/orders",
    tag = "Orders",
    request_body = OrderInput,
    responses(
        (status = 201, description = "Order created", body = Order),
        (status = 400, description = "Bad request. Invalid input data.", body = MessageResponse)
    )
)]
pub async fn create_order_handler(
    State(state): State<AppState>,
    body: JsonBody,
) -> Result<(StatusCode, Json<Document>), ApiError> {
    common::create_record(&state, &OrderModel, body).await
}

#[utoipa::path(
    get,
    path = "/orders",
    tag = "Orders",
    responses(
        (status = 200, description = "Every order, unpaginated", body = [Order]),
        (status = 400, description = "Listing failed", body = MessageResponse)
    )
)]
pub async fn list_orders_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Document>>, ApiError> {
    common::list_records(&state, &OrderModel).await
}

#[utoipa::path(
    get,
    path = "/orders/{id}",
    tag = "Orders",
    params(("id" = String, Path, description = "The order ID")),
    responses(
        (status = 200, description = "The order", body = Order),
        (status = 404, description = "Order not found", body = MessageResponse),
        (status = 500, description = "Lookup failed (e.g. malformed id)", body = MessageResponse)
    )
)]
pub async fn get_order_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Document>, ApiError> {
    common::get_record(&state, &OrderModel, &id).await
}

#[utoipa::path(
    put,
    path = "/orders/{id}",
    tag = "Orders",
    params(("id" = String, Path, description = "The order ID")),
    request_body = OrderInput,
    responses(
        (status = 200, description = "The updated order; any status transition is accepted", body = Order),
        (status = 400, description = "Bad request. Invalid input data.", body = MessageResponse),
        (status = 404, description = "Order not found", body = MessageResponse)
    )
)]
pub async fn update_order_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: JsonBody,
) -> Result<Json<Document>, ApiError> {
    common::update_record(&state, &OrderModel, &id, body).await
}

#[utoipa::path(
    delete,
    path = "/orders/{id}",
    tag = "Orders",
    params(("id" = String, Path, description = "The order ID")),
    responses(
        (status = 200, description = "Order deleted", body = MessageResponse),
        (status = 404, description = "Order not found", body = MessageResponse),
        (status = 500, description = "Delete failed (e.g. malformed id)", body = MessageResponse)
    )
)]
pub async fn delete_order_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    common::delete_record(&state, &OrderModel, &id).await
}
