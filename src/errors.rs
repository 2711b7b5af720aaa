// src/errors.rs
// DOCUMENTATION: Custom error types and HTTP responses
// PURPOSE: Centralized error handling for entire application

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use thiserror::Error;

/// Application-specific error types
/// DOCUMENTATION: Comprehensive error enum for all possible failures
/// Each variant maps to appropriate HTTP status code and error response
#[derive(Error, Debug)]
pub enum TurfError {
    #[error("Place not found with id: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("No geocoding results for \"{0}\" - try a more specific address or landmark")]
    GeocodingNoResults(String),

    #[error("Geocoding failed: {0}")]
    GeocodingFailed(String),

    #[error("Maps API error ({status}): {message}")]
    RemoteApi { status: u16, message: String },

    #[error("External API error: {0}")]
    ExternalApiError(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Unauthorized access")]
    Unauthorized,
}

impl TurfError {
    /// Remediation hint surfaced to front ends alongside the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            TurfError::GeocodingNoResults(_) => {
                Some("Refine the address text, e.g. add an area or city name")
            }
            TurfError::GeocodingFailed(_) | TurfError::ExternalApiError(_) => Some(
                "Check that the API key is valid and the Geocoding/Places APIs are enabled",
            ),
            TurfError::RemoteApi { .. } => {
                Some("Check API key restrictions, enabled services and remaining quota")
            }
            TurfError::RateLimitExceeded => Some("Wait a moment and retry the request"),
            _ => None,
        }
    }
}

/// Convert TurfError to HTTP response
/// DOCUMENTATION: Maps error types to HTTP status codes and JSON responses
impl ResponseError for TurfError {
    fn error_response(&self) -> HttpResponse {
        let (status, error_code) = match self {
            TurfError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            TurfError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "INVALID_INPUT"),
            TurfError::ValidationError(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            TurfError::GeocodingNoResults(_) => (StatusCode::NOT_FOUND, "GEOCODING_NO_RESULTS"),
            TurfError::GeocodingFailed(_) => (StatusCode::BAD_GATEWAY, "GEOCODING_FAILED"),
            TurfError::RemoteApi { .. } => (StatusCode::BAD_GATEWAY, "MAPS_API_ERROR"),
            TurfError::ExternalApiError(_) => (StatusCode::BAD_GATEWAY, "EXTERNAL_API_ERROR"),
            TurfError::RateLimitExceeded => {
                (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMIT_EXCEEDED")
            }
            TurfError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
        };

        let body = json!({
            "error": {
                "code": error_code,
                "message": self.to_string(),
                "hint": self.hint(),
                "timestamp": chrono::Utc::now().to_rfc3339()
            }
        });

        HttpResponse::build(status).json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            TurfError::NotFound(_) => StatusCode::NOT_FOUND,
            TurfError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            TurfError::ValidationError(_) => StatusCode::BAD_REQUEST,
            TurfError::GeocodingNoResults(_) => StatusCode::NOT_FOUND,
            TurfError::GeocodingFailed(_) => StatusCode::BAD_GATEWAY,
            TurfError::RemoteApi { .. } => StatusCode::BAD_GATEWAY,
            TurfError::ExternalApiError(_) => StatusCode::BAD_GATEWAY,
            TurfError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            TurfError::Unauthorized => StatusCode::UNAUTHORIZED,
        }
    }
}
