use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tourvoice_core::TourVoiceError;
use tracing::{error, warn};

/// Core error surfaced over HTTP as `{"detail": "<message>"}`
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub TourVoiceError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            TourVoiceError::TimeoutError(_) => StatusCode::GATEWAY_TIMEOUT,
            TourVoiceError::ValidationError(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = self.0.to_string();
        if status.is_server_error() {
            error!(target: "server", %status, error = %detail, "Request failed");
        } else {
            warn!(target: "server", %status, error = %detail, "Request rejected");
        }
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn status_mapping() {
        let cases = [
            (
                TourVoiceError::TimeoutError(Duration::from_secs(90)),
                StatusCode::GATEWAY_TIMEOUT,
            ),
            (
                TourVoiceError::ValidationError("Unknown voice: x".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                TourVoiceError::ConfigError("API key not configured".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                TourVoiceError::UpstreamError("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                TourVoiceError::EngineLoadError("missing".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                TourVoiceError::SynthesisError("bad".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(ApiError(err).status(), expected);
        }
    }

    #[test]
    fn timeout_message_names_the_deadline() {
        let err = ApiError(TourVoiceError::TimeoutError(Duration::from_secs(90)));
        assert_eq!(err.to_string(), "Narration generation timed out after 90s");
    }
}
