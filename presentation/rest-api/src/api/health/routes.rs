use std::sync::Arc;

use chrono::Utc;
use poem::http::StatusCode;
use poem_openapi::{ApiResponse, Object, OpenApi, payload::Json};
use serde::{Deserialize, Serialize};

use business::application::database::pool_manager::ConnectionPoolManager;
use business::domain::database::engine::PoolStatus;
use business::domain::errors::DatabaseError;

use crate::api::error::{ErrorResponse, IntoErrorResponse};
use crate::api::tags::ApiTags;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize, Object)]
pub struct HealthCheckResponse {
    /// Service status
    pub status: String,
    /// Current server timestamp
    pub timestamp: String,
    /// Service version
    pub version: String,
}

/// Connection pool occupancy
#[derive(Debug, Clone, Serialize, Deserialize, Object)]
pub struct PoolStatusResponse {
    /// Open connections, idle or in use
    pub size: u32,
    /// Open connections waiting in the pool
    pub idle: u32,
    /// Upper bound on open connections
    pub max_connections: u32,
}

impl From<PoolStatus> for PoolStatusResponse {
    fn from(status: PoolStatus) -> Self {
        Self {
            size: status.size,
            idle: status.idle,
            max_connections: status.max_connections,
        }
    }
}

/// Database readiness response
#[derive(Debug, Clone, Serialize, Deserialize, Object)]
pub struct DatabaseHealthResponse {
    /// "healthy" when a round-trip succeeded
    pub status: String,
    /// Engine lifecycle state
    pub engine: String,
    pub pool: Option<PoolStatusResponse>,
    /// Current server timestamp
    pub timestamp: String,
}

#[derive(ApiResponse)]
pub enum DatabaseHealthCheckResponse {
    #[oai(status = 200)]
    Ok(Json<DatabaseHealthResponse>),
    #[oai(status = 503)]
    Unavailable(Json<ErrorResponse>),
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}

/// Health API for monitoring and infrastructure checks
pub struct Api {
    database: Arc<ConnectionPoolManager>,
}

impl Api {
    pub fn new(database: Arc<ConnectionPoolManager>) -> Self {
        Self { database }
    }

    async fn ping_database(&self) -> Result<DatabaseHealthResponse, DatabaseError> {
        let _: u64 = self
            .database
            .with_session(|session| Box::pin(async move { session.execute("SELECT 1").await }))
            .await?;

        Ok(DatabaseHealthResponse {
            status: "healthy".to_string(),
            engine: self.database.state().await.to_string(),
            pool: self.database.status().await.map(PoolStatusResponse::from),
            timestamp: Utc::now().to_rfc3339(),
        })
    }
}

#[OpenApi]
impl Api {
    /// Health check endpoint
    ///
    /// Returns the current status of the service without touching the
    /// database. Suitable for liveness probes.
    #[oai(path = "/health", method = "get", tag = "ApiTags::Health")]
    async fn health_check(&self) -> Json<HealthCheckResponse> {
        Json(HealthCheckResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        })
    }

    /// Database readiness endpoint
    ///
    /// Borrows a pooled session and runs `SELECT 1`. Suitable for readiness
    /// probes.
    ///
    /// ## Response
    /// - `status`: "healthy" if the round-trip succeeded
    /// - `engine`: lifecycle state of the connection pool
    /// - `pool`: open, idle and maximum connection counts
    #[oai(path = "/health/database", method = "get", tag = "ApiTags::Health")]
    async fn database_health(&self) -> DatabaseHealthCheckResponse {
        match self.ping_database().await {
            Ok(health) => DatabaseHealthCheckResponse::Ok(Json(health)),
            Err(e) => {
                let (status, body) = e.into_error_response();
                if status == StatusCode::SERVICE_UNAVAILABLE {
                    DatabaseHealthCheckResponse::Unavailable(body)
                } else {
                    DatabaseHealthCheckResponse::InternalError(body)
                }
            }
        }
    }
}
