use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{ConnectOptions, PgPool};

use business::domain::database::connection_string::ConnectionString;
use business::domain::database::engine::{
    DatabaseEngine, DatabaseSession, EngineFactory, PoolStatus,
};
use business::domain::database::pool_settings::PoolSettings;
use business::domain::database::schema::SchemaRegistry;
use business::domain::errors::DatabaseError;

use crate::session::PostgresSession;

/// Driver options for one physical connection.
///
/// `echo` turns on sqlx statement logging at info level; otherwise statements
/// are not logged at all.
pub fn connect_options(
    url: &ConnectionString,
    settings: &PoolSettings,
) -> Result<PgConnectOptions, DatabaseError> {
    let options = PgConnectOptions::from_str(url.expose()).map_err(|e| {
        DatabaseError::configuration(format!("invalid connection string {}: {}", url, e))
    })?;

    Ok(if settings.echo {
        options.log_statements(log::LevelFilter::Info)
    } else {
        options.disable_statement_logging()
    })
}

/// Pool options derived from the pool settings.
///
/// sqlx has no separate overflow bucket: the hard cap is
/// `pool_size + max_overflow` and connections idle for longer than
/// `overflow_idle_timeout` are closed, which shrinks the pool back after a burst.
/// `min_connections` stays at zero so the pool never connects eagerly.
pub fn pool_options(settings: &PoolSettings) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(settings.max_connections())
        .min_connections(0)
        .acquire_timeout(settings.acquire_timeout)
        .max_lifetime(settings.recycle_interval)
        .idle_timeout(settings.overflow_idle_timeout)
        .test_before_acquire(settings.pre_ping)
}

/// Builds lazily connecting PostgreSQL engines
pub struct PostgresEngineFactory;

impl EngineFactory for PostgresEngineFactory {
    fn create(
        &self,
        url: &ConnectionString,
        settings: &PoolSettings,
    ) -> Result<Arc<dyn DatabaseEngine>, DatabaseError> {
        let engine = PostgresEngine::connect_lazy(url, settings)?;
        Ok(Arc::new(engine))
    }
}

/// sqlx-backed connection pool
pub struct PostgresEngine {
    pool: PgPool,
    max_connections: u32,
}

impl PostgresEngine {
    /// Creates the pool without opening a connection. Must be called from
    /// within a Tokio runtime.
    pub fn connect_lazy(
        url: &ConnectionString,
        settings: &PoolSettings,
    ) -> Result<Self, DatabaseError> {
        settings.validate()?;
        let options = connect_options(url, settings)?;
        let pool = pool_options(settings).connect_lazy_with(options);

        tracing::debug!(
            url = %url,
            max_connections = settings.max_connections(),
            "created lazy PostgreSQL pool"
        );
        Ok(Self {
            pool,
            max_connections: settings.max_connections(),
        })
    }
}

#[async_trait]
impl DatabaseEngine for PostgresEngine {
    async fn acquire(&self) -> Result<Box<dyn DatabaseSession>, DatabaseError> {
        let session = PostgresSession::begin(&self.pool).await?;
        Ok(Box::new(session))
    }

    async fn create_all(&self, registry: &SchemaRegistry) -> Result<(), DatabaseError> {
        let to_init_error = |e: sqlx::Error| DatabaseError::initialization(e.to_string());

        // Dropping the transaction on an early return rolls it back.
        let mut tx = self.pool.begin().await.map_err(to_init_error)?;
        for statement in registry.create_statements() {
            tracing::debug!(%statement, "creating table if missing");
            sqlx::query(&statement)
                .execute(&mut *tx)
                .await
                .map_err(to_init_error)?;
        }
        tx.commit().await.map_err(to_init_error)
    }

    async fn dispose(&self) -> Result<(), DatabaseError> {
        if self.pool.is_closed() {
            return Err(DatabaseError::disposal("pool is already closed"));
        }
        self.pool.close().await;
        Ok(())
    }

    fn status(&self) -> PoolStatus {
        PoolStatus {
            size: self.pool.size(),
            idle: u32::try_from(self.pool.num_idle()).unwrap_or(u32::MAX),
            max_connections: self.max_connections,
        }
    }
}
