use poem::http::StatusCode;
use poem_openapi::payload::Json;

use business::domain::errors::DatabaseError;

use crate::api::error::{ErrorResponse, IntoErrorResponse};

/// Causes stay in the logs; clients only see the error code.
impl IntoErrorResponse for DatabaseError {
    fn into_error_response(self) -> (StatusCode, Json<ErrorResponse>) {
        let (status, name, message) = match &self {
            DatabaseError::Configuration(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "ConfigurationError",
                "database.configuration_error",
            ),
            DatabaseError::UseAfterDispose => (
                StatusCode::SERVICE_UNAVAILABLE,
                "ConfigurationError",
                "database.use_after_dispose",
            ),
            DatabaseError::Session(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "SessionError",
                "database.session_error",
            ),
            DatabaseError::Initialization(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "InitializationError",
                "database.initialization_error",
            ),
            DatabaseError::Disposal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "DisposalError",
                "database.disposal_error",
            ),
        };

        (status, Json(ErrorResponse::new(name, message)))
    }
}
