//! Error mapping for the HTTP boundary
//!
//! Every failure becomes a JSON body of `{"message", "trace_id"}`. The
//! status is decided per error kind; server-side kinds respond with a
//! generic message only, while the full detail is logged under the same
//! trace identifier and never returned to the caller.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use taskboard_core::TaskError;
use tracing::{error, warn};
use uuid::Uuid;

/// HTTP-shaped error carrying the response status and a trace identifier
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    trace_id: String,
}

impl ApiError {
    /// Status code this error responds with
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Trace identifier included in the response and the server-side log
    pub fn trace_id(&self) -> &str {
        &self.trace_id
    }
}

impl From<TaskError> for ApiError {
    fn from(err: TaskError) -> Self {
        let trace_id = Uuid::new_v4().to_string();
        let status = StatusCode::from_u16(err.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let message = if status.is_server_error() {
            // Full detail stays server-side, keyed by the trace id
            error!(trace_id = %trace_id, error = %err, "Request failed");
            "Internal server error".to_string()
        } else {
            warn!(trace_id = %trace_id, error = %err, "Request rejected");
            err.to_string()
        };

        Self {
            status,
            message,
            trace_id,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "message": self.message,
            "trace_id": self.trace_id,
        }));
        (self.status, body).into_response()
    }
}
