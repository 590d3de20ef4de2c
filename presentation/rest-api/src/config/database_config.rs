use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use business::domain::database::connection_string::{
    ConnectionString, DEFAULT_POSTGRES_URL, POSTGRES_URL_ENV,
};
use business::domain::database::pool_settings::PoolSettings;
use business::domain::errors::DatabaseError;

/// Connection string and pool sizing for the database engine
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: ConnectionString,
    pub pool: PoolSettings,
}

impl DatabaseConfig {
    /// Load database configuration from environment variables
    ///
    /// Environment variables:
    /// - POSTGRES_URL: connection URI (default: local development database)
    /// - DB_POOL_SIZE: steady-state connections (default: 10)
    /// - DB_MAX_OVERFLOW: extra connections under load (default: 20)
    /// - DB_POOL_PRE_PING: validate connections before use (default: true)
    /// - DB_POOL_RECYCLE_SECS: maximum connection age (default: 3600)
    /// - DB_POOL_TIMEOUT_SECS: wait for a free connection (default: 30)
    /// - DB_OVERFLOW_IDLE_SECS: idle time before a connection is closed (default: 600)
    /// - DB_ECHO: log every SQL statement (default: false)
    ///
    /// # Errors
    /// Returns a configuration error if POSTGRES_URL is set but empty or invalid,
    /// or if a pool variable cannot be parsed.
    pub fn from_env() -> Result<Self, DatabaseError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, DatabaseError> {
        let raw_url = lookup(POSTGRES_URL_ENV);
        if raw_url.is_none() {
            tracing::warn!(
                "{} is not set, falling back to the local development database",
                POSTGRES_URL_ENV
            );
        }
        let url = ConnectionString::resolve(raw_url, Some(DEFAULT_POSTGRES_URL))?;

        let defaults = PoolSettings::default();
        let pool = PoolSettings {
            pool_size: parse_or(&lookup, "DB_POOL_SIZE", defaults.pool_size)?,
            max_overflow: parse_or(&lookup, "DB_MAX_OVERFLOW", defaults.max_overflow)?,
            pre_ping: parse_flag(&lookup, "DB_POOL_PRE_PING", defaults.pre_ping)?,
            recycle_interval: parse_secs(&lookup, "DB_POOL_RECYCLE_SECS", defaults.recycle_interval)?,
            echo: parse_flag(&lookup, "DB_ECHO", defaults.echo)?,
            acquire_timeout: parse_secs(&lookup, "DB_POOL_TIMEOUT_SECS", defaults.acquire_timeout)?,
            overflow_idle_timeout: parse_secs(
                &lookup,
                "DB_OVERFLOW_IDLE_SECS",
                defaults.overflow_idle_timeout,
            )?,
        };
        pool.validate()?;

        Ok(Self { url, pool })
    }
}

fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, DatabaseError>
where
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| DatabaseError::configuration(format!("{key}: {e}"))),
        None => Ok(default),
    }
}

fn parse_secs(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: Duration,
) -> Result<Duration, DatabaseError> {
    parse_or(lookup, key, default.as_secs()).map(Duration::from_secs)
}

fn parse_flag(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: bool,
) -> Result<bool, DatabaseError> {
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(DatabaseError::configuration(format!(
            "{key}: expected a boolean, got {other:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn should_use_defaults_when_nothing_is_set() {
        // Arrange
        let lookup = lookup_from(&[]);

        // Act
        let config = DatabaseConfig::from_lookup(lookup).unwrap();

        // Assert
        assert_eq!(config.url.database_name(), Some("datalab_georgia"));
        assert_eq!(config.pool, PoolSettings::default());
    }

    #[test]
    fn should_read_pool_overrides() {
        let lookup = lookup_from(&[
            ("POSTGRES_URL", "postgres://svc:secret@db:6543/datalab"),
            ("DB_POOL_SIZE", "5"),
            ("DB_MAX_OVERFLOW", " 0 "),
            ("DB_POOL_PRE_PING", "off"),
            ("DB_POOL_RECYCLE_SECS", "1800"),
            ("DB_ECHO", "TRUE"),
        ]);

        let config = DatabaseConfig::from_lookup(lookup).unwrap();

        assert_eq!(config.url.host(), Some("db"));
        assert_eq!(config.url.port(), Some(6543));
        assert_eq!(config.pool.pool_size, 5);
        assert_eq!(config.pool.max_overflow, 0);
        assert!(!config.pool.pre_ping);
        assert!(config.pool.echo);
        assert_eq!(config.pool.recycle_interval, Duration::from_secs(1800));
    }

    #[test]
    fn should_fail_fast_on_empty_connection_string() {
        let lookup = lookup_from(&[("POSTGRES_URL", "")]);

        let result = DatabaseConfig::from_lookup(lookup);

        assert!(matches!(result, Err(DatabaseError::Configuration(_))));
    }

    #[test]
    fn should_reject_unparsable_pool_size() {
        let lookup = lookup_from(&[("DB_POOL_SIZE", "ten")]);

        let result = DatabaseConfig::from_lookup(lookup);

        assert!(matches!(result, Err(DatabaseError::Configuration(_))));
    }

    #[test]
    fn should_reject_unknown_flag_value() {
        let lookup = lookup_from(&[("DB_POOL_PRE_PING", "maybe")]);

        let result = DatabaseConfig::from_lookup(lookup);

        assert!(matches!(result, Err(DatabaseError::Configuration(_))));
    }

    #[test]
    fn should_reject_zero_pool_size() {
        let lookup = lookup_from(&[("DB_POOL_SIZE", "0")]);

        assert!(DatabaseConfig::from_lookup(lookup).is_err());
    }
}
