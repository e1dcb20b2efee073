//! Standardised API error responses
//!
//! Every error returned by the HTTP layer serialises as:
//! ```json
//! { "ok": false, "error": { "code": "<code>", "message": "<message>" } }
//! ```
//! Core failures are mapped onto status codes by their `ErrorKind`.

use crate::errors::{ErrorKind, ToolError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ApiErrorResponse,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApiErrorResponse {
    pub ok: bool,
    pub error: ApiErrorBody,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ApiErrorResponse {
                ok: false,
                error: ApiErrorBody {
                    code: code.into(),
                    message: message.into(),
                },
            },
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "unauthorized", message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<ToolError> for ApiError {
    fn from(err: ToolError) -> Self {
        let (status, code) = match err.kind() {
            ErrorKind::Validation => (StatusCode::BAD_REQUEST, "validation"),
            ErrorKind::NotFound => (StatusCode::NOT_FOUND, "not_found"),
            ErrorKind::Permission => (StatusCode::FORBIDDEN, "forbidden"),
            ErrorKind::Capacity => (StatusCode::BAD_REQUEST, "capacity"),
            ErrorKind::Timeout => (StatusCode::GATEWAY_TIMEOUT, "timeout"),
            ErrorKind::Execution => (StatusCode::INTERNAL_SERVER_ERROR, "execution"),
        };
        Self::new(status, code, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_to_status_mapping() {
        let cases = [
            (
                ToolError::MissingParameter("title".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                ToolError::ToolNotFound("nope".into()),
                StatusCode::NOT_FOUND,
            ),
            (
                ToolError::CommandNotAllowed("rm".into()),
                StatusCode::FORBIDDEN,
            ),
            (
                ToolError::CapacityExceeded { limit: 1 },
                StatusCode::BAD_REQUEST,
            ),
            (ToolError::ExecutionTimeout(5), StatusCode::GATEWAY_TIMEOUT),
            (
                ToolError::TerminationFailed("zombie".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            let api: ApiError = err.into();
            assert_eq!(api.status(), expected);
        }
    }

    #[test]
    fn test_error_envelope_shape() {
        let api: ApiError = ToolError::TaskNotFound("task_9".into()).into();
        let value = serde_json::to_value(&api.body).unwrap();

        assert_eq!(value["ok"], false);
        assert_eq!(value["error"]["code"], "not_found");
        assert!(value["error"]["message"]
            .as_str()
            .unwrap()
            .contains("task_9"));
    }
}
