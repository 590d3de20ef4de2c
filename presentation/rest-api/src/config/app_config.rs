use business::domain::errors::DatabaseError;
use poem::middleware::Cors;

use super::{cors_config, database_config::DatabaseConfig, server_config::ServerConfig};

pub struct AppConfig {
    pub server: ServerConfig,
    pub cors: Cors,
    pub database: DatabaseConfig,
}

impl AppConfig {
    /// Loads every section from the environment; only the database section
    /// can fail.
    pub fn from_env() -> Result<Self, DatabaseError> {
        Ok(Self {
            server: ServerConfig::from_env(),
            cors: cors_config::init_cors(),
            database: DatabaseConfig::from_env()?,
        })
    }
}
