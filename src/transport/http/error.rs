//! HTTP error mapping.
//!
//! Status depends on the operation, not just the failure:
//! writes (create/update) answer every non-404 failure with 400, reads and
//! deletes answer them with 500, and listing answers with 400. A malformed id
//! is therefore 400 on PUT but 500 on GET/DELETE.

use crate::app::catalogue_service::ServiceError;
use crate::domain::model::MessageResponse;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// create / update
    pub fn from_write(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound(model) => ApiError::NotFound(model),
            other => ApiError::BadRequest(other.to_string()),
        }
    }

    /// get / delete
    pub fn from_read(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound(model) => ApiError::NotFound(model),
            other => ApiError::Internal(other.to_string()),
        }
    }

    /// list
    pub fn from_list(err: ServiceError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(format!("Invalid JSON body: {}", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "request rejected");
        }
        (status, Json(MessageResponse::new(self.to_string()))).into_response()
    }
}
