//! Shared HTTP plumbing: response envelope, error mapping, extractors

pub mod validated_json;

use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::DomainError;

pub use validated_json::{ValidatedJson, ValidatedJsonRejection};

/// Standard API response envelope
///
/// Every REST endpoint wraps its payload in this envelope.
/// On success: `{"success": true, "data": {...}}`,
/// on failure: `{"success": false, "data": null, "error": "description"}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    /// Payload; `null` on failure
    pub data: Option<T>,
    /// Error description; omitted on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Error half of every handler's return type.
pub type ApiError = (StatusCode, Json<ApiResponse<()>>);

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

pub fn error_response(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(ApiResponse::error(message)))
}

pub fn domain_error_status(err: &DomainError) -> StatusCode {
    match err {
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        DomainError::Conflict(_) => StatusCode::CONFLICT,
        DomainError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        DomainError::Forbidden(_) => StatusCode::FORBIDDEN,
        DomainError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<DomainError> for ApiResponse<()> {
    fn from(err: DomainError) -> Self {
        ApiResponse::error(err.to_string())
    }
}

/// Map a domain error onto its HTTP status, logging server-side failures.
pub fn domain_error(err: DomainError) -> ApiError {
    let status = domain_error_status(&err);
    if status.is_server_error() {
        tracing::error!("Request failed: {}", err);
    }
    (status, Json(err.into()))
}
