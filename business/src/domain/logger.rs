/// Logging port used by the application layer.
///
/// Implementations must never receive credentials: callers pass redacted
/// connection strings only.
pub trait Logger: Send + Sync {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
    fn debug(&self, message: &str);
}
