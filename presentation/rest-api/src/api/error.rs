use poem::http::StatusCode;
use poem_openapi::{Object, payload::Json};

/// Error body returned by every endpoint
#[derive(Object, Debug)]
pub struct ErrorResponse {
    /// Error kind, e.g. `SessionError`
    pub name: String,
    /// Code-style message identifier, e.g. `database.session_error`
    pub message: String,
}

impl ErrorResponse {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }
}

pub trait IntoErrorResponse {
    fn into_error_response(self) -> (StatusCode, Json<ErrorResponse>);
}
