/// Database lifecycle errors.
/// Use code-style identifiers for all error variants for i18n compatibility;
/// the payload carries the underlying cause for logging.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DatabaseError {
    #[error("database.configuration_error: {0}")]
    Configuration(String),
    #[error("database.session_error: {0}")]
    Session(String),
    #[error("database.initialization_error: {0}")]
    Initialization(String),
    #[error("database.disposal_error: {0}")]
    Disposal(String),
    #[error("database.use_after_dispose")]
    UseAfterDispose,
}

impl DatabaseError {
    pub fn configuration(cause: impl Into<String>) -> Self {
        DatabaseError::Configuration(cause.into())
    }
    pub fn session(cause: impl Into<String>) -> Self {
        DatabaseError::Session(cause.into())
    }
    pub fn initialization(cause: impl Into<String>) -> Self {
        DatabaseError::Initialization(cause.into())
    }
    pub fn disposal(cause: impl Into<String>) -> Self {
        DatabaseError::Disposal(cause.into())
    }

    /// Returns true for errors caused by misuse of the engine lifecycle or bad
    /// configuration, as opposed to failures reported by the database itself.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            DatabaseError::Configuration(_) | DatabaseError::UseAfterDispose
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_render_code_style_message_with_cause() {
        let error = DatabaseError::session("connection reset by peer");
        assert_eq!(
            error.to_string(),
            "database.session_error: connection reset by peer"
        );
    }

    #[test]
    fn should_classify_use_after_dispose_as_configuration_error() {
        assert!(DatabaseError::UseAfterDispose.is_configuration());
        assert!(DatabaseError::configuration("missing url").is_configuration());
        assert!(!DatabaseError::session("timeout").is_configuration());
        assert!(!DatabaseError::disposal("boom").is_configuration());
    }
}
