//! API error bodies and the mapping from core errors to HTTP statuses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::sim::types::CommandError;

/// Error response body for 4xx errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}

/// HTTP status for a failed device command.
pub fn status_for(err: &CommandError) -> StatusCode {
    match err {
        CommandError::DeviceNotFound { .. } => StatusCode::NOT_FOUND,
        CommandError::InvalidAction { .. } => StatusCode::BAD_REQUEST,
    }
}

impl IntoResponse for CommandError {
    fn into_response(self) -> Response {
        let status = status_for(&self);
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_errors_to_statuses() {
        assert_eq!(
            status_for(&CommandError::DeviceNotFound { id: "x".into() }),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&CommandError::InvalidAction {
                action: "toggle".into()
            }),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn error_response_uses_error_message() {
        let resp = CommandError::InvalidAction {
            action: "toggle".into(),
        }
        .into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
