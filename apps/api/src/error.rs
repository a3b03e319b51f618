use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use blablabook_core::AppError;
use serde::Serialize;
use tracing::error;
use ts_rs::TS;

/// API error payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/error-response.ts"
)]
pub struct ErrorResponse {
    success: bool,
    message: String,
    code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    required_permission: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    resource: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    resource_id: Option<String>,
}

/// HTTP API error wrapper around core application errors.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(value: AppError) -> Self {
        Self(value)
    }
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self.0 {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "NOT_AUTHENTICATED"),
            AppError::InvalidSession(_) => (StatusCode::UNAUTHORIZED, "INVALID_SESSION"),
            AppError::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            AppError::PermissionDenied { .. } => (StatusCode::FORBIDDEN, "PERMISSION_DENIED"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            AppError::Unavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = if status.is_server_error() {
            error!(code, error = %self.0, "request failed");
            match status {
                StatusCode::SERVICE_UNAVAILABLE => "service temporarily unavailable".to_owned(),
                _ => "internal server error".to_owned(),
            }
        } else {
            self.0.to_string()
        };

        let (required_permission, resource, resource_id) = match self.0 {
            AppError::PermissionDenied {
                permission,
                resource,
                resource_id,
            } => (Some(permission), resource, resource_id),
            _ => (None, None, None),
        };

        let payload = Json(ErrorResponse {
            success: false,
            message,
            code: code.to_owned(),
            required_permission,
            resource,
            resource_id,
        });

        (status, payload).into_response()
    }
}

/// Standard API result type.
pub type ApiResult<T> = Result<T, ApiError>;
