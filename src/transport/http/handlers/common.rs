//! Shared request plumbing for the resource handlers. Each helper performs a
//! single service call and shapes the response.

use crate::domain::model::{MessageResponse, ResourceModel};
use crate::storage::document::Document;
use crate::transport::http::error::ApiError;
use crate::transport::http::types::AppState;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::Json;
use serde_json::Value as JsonValue;

pub type JsonBody = Result<Json<JsonValue>, JsonRejection>;

pub async fn create_record(
    state: &AppState,
    model: &dyn ResourceModel,
    body: JsonBody,
) -> Result<(StatusCode, Json<Document>), ApiError> {
    let Json(body) = body?;
    let record = state
        .service
        .create(model, &body)
        .await
        .map_err(ApiError::from_write)?;
    tracing::info!(
        model = model.model_name(),
        id = record_id(&record),
        "record created"
    );
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn get_record(
    state: &AppState,
    model: &dyn ResourceModel,
    id: &str,
) -> Result<Json<Document>, ApiError> {
    let record = state
        .service
        .get(model, id)
        .await
        .map_err(ApiError::from_read)?;
    Ok(Json(record))
}

pub async fn list_records(
    state: &AppState,
    model: &dyn ResourceModel,
) -> Result<Json<Vec<Document>>, ApiError> {
    let records = state
        .service
        .list(model)
        .await
        .map_err(ApiError::from_list)?;
    tracing::debug!(model = model.model_name(), count = records.len(), "records listed");
    Ok(Json(records))
}

pub async fn update_record(
    state: &AppState,
    model: &dyn ResourceModel,
    id: &str,
    body: JsonBody,
) -> Result<Json<Document>, ApiError> {
    let Json(body) = body?;
    let record = state
        .service
        .update(model, id, &body)
        .await
        .map_err(ApiError::from_write)?;
    tracing::info!(model = model.model_name(), id, "record updated");
    Ok(Json(record))
}

pub async fn delete_record(
    state: &AppState,
    model: &dyn ResourceModel,
    id: &str,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .service
        .delete(model, id)
        .await
        .map_err(ApiError::from_read)?;
    tracing::info!(model = model.model_name(), id, "record deleted");
    Ok(Json(MessageResponse::new(format!(
        "{} deleted successfully",
        model.model_name()
    ))))
}

fn record_id(record: &Document) -> &str {
    record
        .get(crate::storage::document::ID_FIELD)
        .and_then(|v| v.as_str())
        .unwrap_or_default()
}
