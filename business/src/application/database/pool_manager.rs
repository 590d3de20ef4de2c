use std::fmt::Display;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::application::database::scoped_session::ScopedSession;
use crate::domain::database::connection_string::ConnectionString;
use crate::domain::database::engine::{DatabaseEngine, DatabaseSession, EngineFactory, PoolStatus};
use crate::domain::database::lifecycle::LifecycleState;
use crate::domain::database::pool_settings::PoolSettings;
use crate::domain::database::schema::SchemaRegistry;
use crate::domain::errors::DatabaseError;
use crate::domain::logger::Logger;

/// Future returned by the unit of work passed to
/// [`ConnectionPoolManager::with_session`].
pub type SessionFuture<'s, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 's>>;

enum EngineSlot {
    Uninitialized,
    Ready(Arc<dyn DatabaseEngine>),
    Disposed,
}

/// Owns the connection pool and scopes sessions borrowed from it.
///
/// Built once at startup and shared (behind an `Arc`) with the request layer,
/// which only ever calls [`acquire`](Self::acquire) or
/// [`with_session`](Self::with_session).
pub struct ConnectionPoolManager {
    factory: Arc<dyn EngineFactory>,
    logger: Arc<dyn Logger>,
    slot: RwLock<EngineSlot>,
}

impl ConnectionPoolManager {
    pub fn new(factory: Arc<dyn EngineFactory>, logger: Arc<dyn Logger>) -> Self {
        Self {
            factory,
            logger,
            slot: RwLock::new(EngineSlot::Uninitialized),
        }
    }

    pub async fn state(&self) -> LifecycleState {
        match &*self.slot.read().await {
            EngineSlot::Uninitialized => LifecycleState::Uninitialized,
            EngineSlot::Ready(_) => LifecycleState::Ready,
            EngineSlot::Disposed => LifecycleState::Disposed,
        }
    }

    /// Builds the pool. No connection is opened until the first session is
    /// acquired.
    pub async fn initialize(
        &self,
        url: &ConnectionString,
        settings: &PoolSettings,
    ) -> Result<(), DatabaseError> {
        settings.validate()?;

        let mut slot = self.slot.write().await;
        match &*slot {
            EngineSlot::Uninitialized => {}
            EngineSlot::Ready(_) => {
                return Err(DatabaseError::configuration(
                    "database engine is already initialized",
                ));
            }
            EngineSlot::Disposed => return Err(DatabaseError::UseAfterDispose),
        }

        let engine = self.factory.create(url, settings)?;
        *slot = EngineSlot::Ready(engine);

        self.logger.info(&format!(
            "Database engine initialized for {} (pool_size={}, max_overflow={}, pre_ping={}, recycle={}s)",
            url,
            settings.pool_size,
            settings.max_overflow,
            settings.pre_ping,
            settings.recycle_interval.as_secs()
        ));
        Ok(())
    }

    async fn engine(&self) -> Result<Arc<dyn DatabaseEngine>, DatabaseError> {
        match &*self.slot.read().await {
            EngineSlot::Ready(engine) => Ok(engine.clone()),
            EngineSlot::Uninitialized => Err(DatabaseError::configuration(
                "database engine is not initialized",
            )),
            EngineSlot::Disposed => Err(DatabaseError::UseAfterDispose),
        }
    }

    /// Borrows a session for one unit of work.
    ///
    /// Waits while the pool is exhausted, up to the configured acquire timeout.
    pub async fn acquire(&self) -> Result<ScopedSession, DatabaseError> {
        let engine = self.engine().await?;
        match engine.acquire().await {
            Ok(session) => Ok(ScopedSession::new(session, self.logger.clone())),
            Err(e) => {
                self.logger
                    .error(&format!("Database session error: {}", e));
                Err(e)
            }
        }
    }

    /// Runs `work` against a freshly borrowed session.
    ///
    /// On `Ok` the session is closed. On `Err` uncommitted work is rolled back,
    /// the error is logged, the session is closed and the same error is
    /// returned. If the returned future is dropped midway, the session is
    /// still rolled back and closed.
    pub async fn with_session<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: for<'s> FnOnce(&'s mut dyn DatabaseSession) -> SessionFuture<'s, T, E>,
        T: Send,
        E: From<DatabaseError> + Display + Send,
    {
        let mut scoped = self.acquire().await?;

        let outcome = match scoped.inner_mut() {
            Some(session) => work(session).await,
            None => Err(DatabaseError::session("session already released").into()),
        };

        match outcome {
            Ok(value) => {
                scoped.close().await?;
                Ok(value)
            }
            Err(error) => {
                let cause = error.to_string();
                scoped.abort(&cause).await;
                Err(error)
            }
        }
    }

    /// Creates every registered table that does not exist yet.
    ///
    /// Safe to call repeatedly; existing tables are left untouched.
    pub async fn initialize_schema(&self, registry: &SchemaRegistry) -> Result<(), DatabaseError> {
        let engine = self.engine().await?;
        match engine.create_all(registry).await {
            Ok(()) => {
                self.logger.info(&format!(
                    "Database tables initialized successfully ({} registered)",
                    registry.len()
                ));
                Ok(())
            }
            Err(e) => {
                self.logger
                    .error(&format!("Failed to initialize database: {}", e));
                Err(match e {
                    DatabaseError::Initialization(_) => e,
                    other => DatabaseError::initialization(other.to_string()),
                })
            }
        }
    }

    /// Closes every pooled connection. Failures are logged and swallowed so
    /// shutdown can proceed.
    pub async fn dispose(&self) {
        let previous = {
            let mut slot = self.slot.write().await;
            std::mem::replace(&mut *slot, EngineSlot::Disposed)
        };

        let engine = match previous {
            EngineSlot::Ready(engine) => engine,
            EngineSlot::Uninitialized => {
                self.logger
                    .debug("Database engine disposed before initialization");
                return;
            }
            EngineSlot::Disposed => {
                self.logger.debug("Database engine already disposed");
                return;
            }
        };

        match engine.dispose().await {
            Ok(()) => self
                .logger
                .info("Database connections closed successfully"),
            Err(e) => self
                .logger
                .error(&format!("Error closing database connections: {}", e)),
        }
    }

    /// Pool occupancy, available only while the engine is ready.
    pub async fn status(&self) -> Option<PoolStatus> {
        match &*self.slot.read().await {
            EngineSlot::Ready(engine) => Some(engine.status()),
            _ => None,
        }
    }
}
