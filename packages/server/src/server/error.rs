//! HTTP error mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use crate::error::OrchestrateError;
use crate::store::StoreError;

/// JSON body returned for every error response.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// An error ready to be rendered as an HTTP response.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, message = %self.message, "request failed");
        }
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

impl From<OrchestrateError> for ApiError {
    fn from(e: OrchestrateError) -> Self {
        match e {
            OrchestrateError::EmptyInput
            | OrchestrateError::InvalidProvider(_)
            | OrchestrateError::MissingIdea(_) => Self::bad_request(e.to_string()),
            OrchestrateError::ContentNotFound(_) | OrchestrateError::TaskNotFound(_) => {
                Self::not_found(e.to_string())
            }
            OrchestrateError::QueueClosed | OrchestrateError::Store(_) => {
                Self::internal(e.to_string())
            }
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        Self::internal(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_validation_errors_are_bad_requests() {
        let api: ApiError = OrchestrateError::EmptyInput.into();
        assert_eq!(api.status, StatusCode::BAD_REQUEST);

        let api: ApiError = OrchestrateError::MissingIdea(Uuid::nil()).into();
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_lookup_errors_are_not_found() {
        let api: ApiError = OrchestrateError::ContentNotFound(Uuid::nil()).into();
        assert_eq!(api.status, StatusCode::NOT_FOUND);

        let api: ApiError = OrchestrateError::TaskNotFound(Uuid::nil()).into();
        assert_eq!(api.status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_queue_closed_is_internal() {
        let api: ApiError = OrchestrateError::QueueClosed.into();
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
