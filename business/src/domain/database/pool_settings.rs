use std::time::Duration;

use crate::domain::errors::DatabaseError;

pub const DEFAULT_POOL_SIZE: u32 = 10;
pub const DEFAULT_MAX_OVERFLOW: u32 = 20;
pub const DEFAULT_RECYCLE_INTERVAL: Duration = Duration::from_secs(3600);
pub const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_OVERFLOW_IDLE_TIMEOUT: Duration = Duration::from_secs(600);

/// Sizing and health-check parameters for the connection pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolSettings {
    /// Steady-state number of connections.
    pub pool_size: u32,
    /// Transient connections allowed on top of `pool_size` under load.
    pub max_overflow: u32,
    /// Validate a pooled connection before handing it out.
    pub pre_ping: bool,
    /// Connections older than this are closed and replaced.
    pub recycle_interval: Duration,
    /// Log every statement sent to the database.
    pub echo: bool,
    /// How long a caller waits for a free connection before failing.
    pub acquire_timeout: Duration,
    /// How long an idle connection is kept before being closed.
    pub overflow_idle_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            pool_size: DEFAULT_POOL_SIZE,
            max_overflow: DEFAULT_MAX_OVERFLOW,
            pre_ping: true,
            recycle_interval: DEFAULT_RECYCLE_INTERVAL,
            echo: false,
            acquire_timeout: DEFAULT_ACQUIRE_TIMEOUT,
            overflow_idle_timeout: DEFAULT_OVERFLOW_IDLE_TIMEOUT,
        }
    }
}

impl PoolSettings {
    /// Upper bound on physical connections open at the same time.
    pub fn max_connections(&self) -> u32 {
        self.pool_size.saturating_add(self.max_overflow)
    }

    pub fn validate(&self) -> Result<(), DatabaseError> {
        if self.pool_size == 0 {
            return Err(DatabaseError::configuration("pool_size must be at least 1"));
        }
        if self.pool_size.checked_add(self.max_overflow).is_none() {
            return Err(DatabaseError::configuration(
                "pool_size + max_overflow exceeds the connection limit",
            ));
        }
        if self.recycle_interval.is_zero() {
            return Err(DatabaseError::configuration(
                "recycle_interval must be greater than zero",
            ));
        }
        if self.acquire_timeout.is_zero() {
            return Err(DatabaseError::configuration(
                "acquire_timeout must be greater than zero",
            ));
        }
        Ok(())
    }
}
