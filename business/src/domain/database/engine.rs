use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::errors::DatabaseError;

use super::connection_string::ConnectionString;
use super::pool_settings::PoolSettings;
use super::schema::SchemaRegistry;

/// Snapshot of pool occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStatus {
    /// Physical connections currently open, idle or in use.
    pub size: u32,
    pub idle: u32,
    pub max_connections: u32,
}

impl PoolStatus {
    pub fn in_use(&self) -> u32 {
        self.size.saturating_sub(self.idle)
    }
}

/// One borrowed connection with its unit of work.
///
/// Work starts implicitly with the first statement after acquisition or after
/// the previous commit/rollback.
#[async_trait]
pub trait DatabaseSession: Send {
    /// Runs a statement and returns the number of affected rows.
    async fn execute(&mut self, statement: &str) -> Result<u64, DatabaseError>;
    async fn commit(&mut self) -> Result<(), DatabaseError>;
    async fn rollback(&mut self) -> Result<(), DatabaseError>;
    /// Discards uncommitted work and returns the connection to the pool.
    async fn close(&mut self) -> Result<(), DatabaseError>;
}

/// A bounded connection pool.
#[async_trait]
pub trait DatabaseEngine: Send + Sync {
    /// Borrows a connection, waiting while the pool is exhausted.
    async fn acquire(&self) -> Result<Box<dyn DatabaseSession>, DatabaseError>;
    /// Creates every registered table that does not exist, in one transaction.
    async fn create_all(&self, registry: &SchemaRegistry) -> Result<(), DatabaseError>;
    /// Closes every pooled connection.
    async fn dispose(&self) -> Result<(), DatabaseError>;
    fn status(&self) -> PoolStatus;
}

/// Builds engines without opening any connection.
pub trait EngineFactory: Send + Sync {
    fn create(
        &self,
        url: &ConnectionString,
        settings: &PoolSettings,
    ) -> Result<Arc<dyn DatabaseEngine>, DatabaseError>;
}
