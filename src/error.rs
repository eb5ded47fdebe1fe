use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::api::EstimationResponse;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("GROQ_API_KEY environment variable is not set")]
    MissingApiKey,

    #[error("GROQ_API_KEY contains characters not allowed in an HTTP header")]
    InvalidApiKey,

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// Failures of the outbound call to the vision model provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider request timed out after {0} ms")]
    Timeout(u64),

    #[error("failed to send provider request: {0}")]
    Request(#[source] reqwest::Error),

    #[error("provider request failed ({status}): {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode provider response: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("provider response contained no completion choices")]
    EmptyCompletion,

    #[error("provider completion has no text content")]
    MissingContent,
}

#[derive(Debug, Error)]
pub enum EstimateError {
    #[error("No image URL provided")]
    Validation,

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl EstimateError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation => StatusCode::BAD_REQUEST,
            Self::Provider(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for EstimateError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(EstimationResponse::failure(self.to_string()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_bad_request_with_fixed_message() {
        let err = EstimateError::Validation;
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "No image URL provided");
    }

    #[test]
    fn provider_error_text_passes_through() {
        let err = EstimateError::from(ProviderError::Status {
            status: 401,
            body: "invalid api key".to_string(),
        });
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "provider request failed (401): invalid api key");
    }

    #[test]
    fn timeout_message_names_the_budget() {
        assert_eq!(
            ProviderError::Timeout(250).to_string(),
            "provider request timed out after 250 ms"
        );
    }
}
