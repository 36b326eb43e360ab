//! Error types for painel-api

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use painel_core::{CoreError, DefaultErrorLogger, ErrorCode, ErrorContext, ErrorDetails, ErrorLogger};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Bad request: {message}")]
    BadRequest { message: String },
}

/// Result type for route handlers
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest {
            message: message.into(),
        }
    }

    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Core(error) => match error {
                CoreError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                CoreError::NotFound { .. } => StatusCode::NOT_FOUND,
                CoreError::ScopeMismatch { .. } => StatusCode::BAD_REQUEST,
                CoreError::NothingToExport => StatusCode::BAD_REQUEST,
                CoreError::Persistence { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        }
    }

    pub fn to_details(&self) -> ErrorDetails {
        match self {
            ApiError::Core(error) => error.to_details(),
            ApiError::BadRequest { message } => {
                ErrorDetails::new(ErrorCode::ValidationError, message.clone())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Core(error) => DefaultErrorLogger.log_error(error, &ErrorContext::new("api request")),
            ApiError::BadRequest { message } => log::warn!(target: "painel::error", "Bad request: {}", message),
        }
        (self.status(), Json(self.to_details())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (CoreError::validation("amount", "bad"), StatusCode::UNPROCESSABLE_ENTITY),
            (
                CoreError::NotFound {
                    resource: "client".to_string(),
                    id: "1".to_string(),
                },
                StatusCode::NOT_FOUND,
            ),
            (CoreError::NothingToExport, StatusCode::BAD_REQUEST),
            (CoreError::persistence("disk full"), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (error, status) in cases {
            assert_eq!(ApiError::from(error).status(), status);
        }
    }

    #[test]
    fn test_bad_request_details() {
        let details = ApiError::bad_request("ano must be a number").to_details();
        assert_eq!(details.code, ErrorCode::ValidationError);
        assert!(details.message.contains("ano"));
    }
}
