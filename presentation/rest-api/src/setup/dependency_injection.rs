use std::sync::Arc;

use business::application::database::pool_manager::ConnectionPoolManager;
use logger::TracingLogger;
use persistence::db::PostgresEngineFactory;
use persistence::models;

use crate::config::database_config::DatabaseConfig;

pub struct DependencyContainer {
    pub health_api: crate::api::health::routes::Api,
    pub database: Arc<ConnectionPoolManager>,
}

impl DependencyContainer {
    /// Builds the connection pool and creates any missing tables.
    ///
    /// If schema creation fails the pool is disposed before the error is
    /// returned, so a failed startup leaves no connections behind.
    pub async fn new(config: &DatabaseConfig) -> anyhow::Result<Self> {
        let logger = Arc::new(TracingLogger);
        let registry = models::registry()?;

        // Infrastructure adapters
        let database = Arc::new(ConnectionPoolManager::new(
            Arc::new(PostgresEngineFactory),
            logger,
        ));
        database.initialize(&config.url, &config.pool).await?;

        if let Err(e) = database.initialize_schema(&registry).await {
            database.dispose().await;
            return Err(e.into());
        }

        let health_api = crate::api::health::routes::Api::new(database.clone());

        Ok(Self {
            health_api,
            database,
        })
    }
}
