use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use business::domain::database::engine::DatabaseSession;
use business::domain::errors::DatabaseError;

/// Converts a driver error into the domain error returned to callers.
pub fn map_sqlx_error(error: sqlx::Error) -> DatabaseError {
    match error {
        sqlx::Error::PoolClosed => DatabaseError::UseAfterDispose,
        sqlx::Error::PoolTimedOut => {
            DatabaseError::session("timed out waiting for a pooled connection")
        }
        sqlx::Error::Configuration(e) => DatabaseError::configuration(e.to_string()),
        other => DatabaseError::session(other.to_string()),
    }
}

/// A pooled connection with an open transaction.
///
/// Committing or rolling back hands the connection back to the pool; the next
/// statement borrows one again and opens a new transaction.
pub struct PostgresSession {
    pool: PgPool,
    transaction: Option<Transaction<'static, Postgres>>,
}

impl PostgresSession {
    /// Borrows a connection and opens a transaction on it.
    pub async fn begin(pool: &PgPool) -> Result<Self, DatabaseError> {
        let transaction = pool.begin().await.map_err(map_sqlx_error)?;
        Ok(Self {
            pool: pool.clone(),
            transaction: Some(transaction),
        })
    }

    pub fn in_transaction(&self) -> bool {
        self.transaction.is_some()
    }

    async fn active(&mut self) -> Result<&mut Transaction<'static, Postgres>, DatabaseError> {
        let transaction = match self.transaction.take() {
            Some(transaction) => transaction,
            None => self.pool.begin().await.map_err(map_sqlx_error)?,
        };
        Ok(self.transaction.insert(transaction))
    }
}

#[async_trait]
impl DatabaseSession for PostgresSession {
    async fn execute(&mut self, statement: &str) -> Result<u64, DatabaseError> {
        let transaction = self.active().await?;
        let result = sqlx::query(statement)
            .execute(&mut **transaction)
            .await
            .map_err(map_sqlx_error)?;
        Ok(result.rows_affected())
    }

    async fn commit(&mut self) -> Result<(), DatabaseError> {
        match self.transaction.take() {
            Some(transaction) => transaction.commit().await.map_err(map_sqlx_error),
            None => Ok(()),
        }
    }

    async fn rollback(&mut self) -> Result<(), DatabaseError> {
        match self.transaction.take() {
            Some(transaction) => transaction.rollback().await.map_err(map_sqlx_error),
            None => Ok(()),
        }
    }

    async fn close(&mut self) -> Result<(), DatabaseError> {
        self.rollback().await
    }
}
