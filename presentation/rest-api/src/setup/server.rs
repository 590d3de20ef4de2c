use std::time::Duration;

use poem::{EndpointExt, Route, Server as PoemServer, listener::TcpListener, middleware::Tracing};
use poem_openapi::OpenApiService;

use crate::{config::app_config::AppConfig, setup::dependency_injection::DependencyContainer};

const SHUTDOWN_GRACE_PERIOD: Duration = Duration::from_secs(10);

pub struct Server;

impl Server {
    /// Serves the API until ctrl-c, then drains requests and disposes the
    /// database engine.
    pub async fn run(config: AppConfig, container: DependencyContainer) -> anyhow::Result<()> {
        let addr = config.server.bind_address();
        let api_service = OpenApiService::new(
            container.health_api,
            "DataLab Backend API",
            env!("CARGO_PKG_VERSION"),
        )
        .server(format!("http://{}", addr));
        let ui = api_service.swagger_ui();
        let spec = api_service.spec_endpoint();
        let app = Route::new()
            .nest("/", api_service)
            .nest("/docs", ui)
            .nest("/openapi.json", spec)
            .with(config.cors)
            .with(Tracing);

        tracing::info!("Server running at http://{}", addr);
        tracing::info!("Swagger UI at http://{}/docs", addr);

        let served = PoemServer::new(TcpListener::bind(&addr))
            .run_with_graceful_shutdown(app, shutdown_signal(), Some(SHUTDOWN_GRACE_PERIOD))
            .await;

        container.database.dispose().await;
        served?;
        Ok(())
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => {
            tracing::error!("Unable to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
