//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use entryguard_domain::error::{EntryGuardError, ValidationError};

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    message: String,
}

/// Maps controller failures to an HTTP response with appropriate status code.
#[derive(Debug)]
pub enum ApiError {
    Domain(EntryGuardError),
    /// The request body carried no `state` field.
    MissingState,
    /// The caller token was absent or wrong.
    Unauthorized,
}

impl From<EntryGuardError> for ApiError {
    fn from(err: EntryGuardError) -> Self {
        Self::Domain(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::Domain(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Domain(EntryGuardError::Validation(err)) => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            Self::Domain(err) => {
                tracing::error!(error = %err, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
            Self::MissingState => (StatusCode::BAD_REQUEST, "Invalid state".to_string()),
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
        };

        (
            status,
            Json(ErrorBody {
                success: false,
                message,
            }),
        )
            .into_response()
    }
}
