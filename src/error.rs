use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::language::UnknownLanguage;

/// Failures that surface to callers of the HTTP and WebSocket endpoints.
///
/// Speech-recognition sentinels ("not recognized", backend errors) are not
/// part of this taxonomy: they travel inside a normal response payload so
/// the caller can simply retry.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The inference service could not load or run a model.
    #[error("model unavailable: {0}")]
    ModelUnavailable(String),

    /// Language selector outside the two recognized values.
    #[error("unsupported language {0:?}: expected \"english\" or \"spanish\"")]
    InvalidLanguage(String),

    /// A WebSocket peer violated the listen protocol or dropped early.
    #[error("channel protocol error: {0}")]
    ChannelProtocol(String),
}

impl From<UnknownLanguage> for AppError {
    fn from(err: UnknownLanguage) -> Self {
        AppError::InvalidLanguage(err.0)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::ModelUnavailable(_) => StatusCode::BAD_GATEWAY,
            AppError::InvalidLanguage(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::ChannelProtocol(_) => StatusCode::BAD_REQUEST,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_language_maps_to_unprocessable_entity() {
        let response = AppError::InvalidLanguage("german".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn model_unavailable_maps_to_bad_gateway() {
        let response = AppError::ModelUnavailable("connection refused".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
