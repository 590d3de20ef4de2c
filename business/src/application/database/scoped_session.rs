use std::fmt::Display;
use std::sync::Arc;

use crate::domain::database::engine::DatabaseSession;
use crate::domain::errors::DatabaseError;
use crate::domain::logger::Logger;

/// A session borrowed from the pool for one unit of work.
///
/// The connection goes back to the pool exactly once: through [`close`],
/// through [`abort`], or, if the guard is dropped while still holding it
/// (early return, panic, task cancellation), through a rollback-and-close
/// task spawned on the current runtime.
///
/// [`close`]: ScopedSession::close
/// [`abort`]: ScopedSession::abort
pub struct ScopedSession {
    session: Option<Box<dyn DatabaseSession>>,
    logger: Arc<dyn Logger>,
}

impl ScopedSession {
    pub(crate) fn new(session: Box<dyn DatabaseSession>, logger: Arc<dyn Logger>) -> Self {
        Self {
            session: Some(session),
            logger,
        }
    }

    pub(crate) fn inner_mut(&mut self) -> Option<&mut (dyn DatabaseSession + 'static)> {
        self.session.as_deref_mut()
    }

    fn released() -> DatabaseError {
        DatabaseError::session("session already released")
    }

    pub async fn execute(&mut self, statement: &str) -> Result<u64, DatabaseError> {
        match self.session.as_deref_mut() {
            Some(session) => session.execute(statement).await,
            None => Err(Self::released()),
        }
    }

    pub async fn commit(&mut self) -> Result<(), DatabaseError> {
        match self.session.as_deref_mut() {
            Some(session) => session.commit().await,
            None => Err(Self::released()),
        }
    }

    pub async fn rollback(&mut self) -> Result<(), DatabaseError> {
        match self.session.as_deref_mut() {
            Some(session) => session.rollback().await,
            None => Err(Self::released()),
        }
    }

    /// Returns the connection to the pool. Uncommitted work is discarded.
    pub async fn close(mut self) -> Result<(), DatabaseError> {
        let Some(mut session) = self.session.take() else {
            return Ok(());
        };
        let result = session.close().await;
        if let Err(e) = &result {
            self.logger
                .error(&format!("Error closing database session: {}", e));
        }
        result
    }

    /// Error exit: rolls back, logs `error` as the session failure, then
    /// closes. Never fails; the caller re-raises its own error.
    pub async fn abort(mut self, error: &str) {
        let Some(mut session) = self.session.take() else {
            return;
        };
        if let Err(e) = session.rollback().await {
            self.logger
                .error(&format!("Database rollback failed: {}", e));
        }
        self.logger
            .error(&format!("Database session error: {}", error));
        if let Err(e) = session.close().await {
            self.logger
                .error(&format!("Error closing database session: {}", e));
        }
    }

    /// Same as [`abort`](ScopedSession::abort) for any displayable error.
    pub async fn fail<E: Display>(self, error: E) -> E {
        self.abort(&error.to_string()).await;
        error
    }
}

impl Drop for ScopedSession {
    fn drop(&mut self) {
        let Some(mut session) = self.session.take() else {
            return;
        };
        let logger = self.logger.clone();
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    logger.warn("Database session dropped before release, rolling back");
                    if let Err(e) = session.rollback().await {
                        logger.error(&format!("Database rollback failed: {}", e));
                    }
                    if let Err(e) = session.close().await {
                        logger.error(&format!("Error closing database session: {}", e));
                    }
                });
            }
            Err(_) => {
                logger.warn(
                    "Database session dropped outside a runtime, releasing without rollback",
                );
            }
        }
    }
}
