use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use sdrbot_core::SdrbotError;
use tracing::error;

/// Wrapper turning [`SdrbotError`] into an HTTP response.
///
/// One mapping for the whole API: unknown session → 404, failed LLM exchange
/// → 502, everything else → 500. Bodies follow the `{"detail": …}` shape the
/// original service used.
#[derive(Debug)]
pub struct ApiError(pub SdrbotError);

impl From<SdrbotError> for ApiError {
    fn from(err: SdrbotError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            SdrbotError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            SdrbotError::Llm(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!(error = %self.0, "request failed");
        }
        let detail = match &self.0 {
            SdrbotError::SessionNotFound(_) => "Session not found".to_string(),
            SdrbotError::Llm(_) => "LLM request failed".to_string(),
            other => other.to_string(),
        };
        (status, Json(serde_json::json!({ "detail": detail }))).into_response()
    }
}
