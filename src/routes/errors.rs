use crate::models::ErrorResponse;
use crate::services::{MatchStoreError, StoreError};
use actix_web::http::StatusCode;
use actix_web::{error, HttpRequest, HttpResponse, ResponseError};
use thiserror::Error;

/// Errors surfaced by HTTP handlers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Document store error: {0}")]
    Store(#[from] StoreError),

    #[error("Match store error: {0}")]
    MatchStore(#[from] MatchStoreError),

    #[error("Match store is not configured")]
    MatchStoreUnavailable,
}

impl ApiError {
    fn kind(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "validation_failed",
            ApiError::InvalidPayload(_) => "invalid_payload",
            ApiError::Store(StoreError::NotFound(_)) => "not_found",
            ApiError::Store(_) => "document_store_error",
            ApiError::MatchStore(_) => "match_store_error",
            ApiError::MatchStoreUnavailable => "match_store_unavailable",
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Store(_) => StatusCode::BAD_GATEWAY,
            ApiError::MatchStore(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::MatchStoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }

        HttpResponse::build(status).json(ErrorResponse {
            error: self.kind().to_string(),
            message: self.to_string(),
            status_code: status.as_u16(),
        })
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    ApiError::InvalidPayload(format!("Invalid JSON: {}", err)).into()
}
