use business::domain::logger::Logger;
use tracing::{debug, error, info, warn};

/// Forwards the application's log lines to `tracing` under the `datalab::db`
/// target, so they can be filtered with `RUST_LOG=datalab::db=debug`.
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn info(&self, message: &str) {
        info!(target: "datalab::db", "{}", message);
    }
    fn warn(&self, message: &str) {
        warn!(target: "datalab::db", "{}", message);
    }
    fn error(&self, message: &str) {
        error!(target: "datalab::db", "{}", message);
    }
    fn debug(&self, message: &str) {
        debug!(target: "datalab::db", "{}", message);
    }
}
