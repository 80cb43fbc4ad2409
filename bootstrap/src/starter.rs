//! Service starter
//!
//! Unified entry point for service binaries.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use catalog_config::AppConfig;
use catalog_errors::AppResult;
use tonic::transport::Server;
use tonic::transport::server::Router;
use tracing::{error, info};

use crate::health::{HealthChecker, HealthServer};
use crate::infrastructure::Infrastructure;
use crate::metrics::{MetricsRecorder, PoolMetricsCollector};
use crate::runtime::{init_runtime, shutdown_signal};

/// Run a gRPC service.
///
/// Loads configuration, initializes tracing and metrics, builds the
/// infrastructure (with retry), starts the health HTTP server on
/// `grpc port + 1000`, hands a [`Server`] builder to the caller to register
/// services on, and serves until SIGINT/SIGTERM.
pub async fn run_server<F, Fut>(
    config_dir: &str,
    server_builder: F,
) -> Result<(), Box<dyn std::error::Error>>
where
    F: FnOnce(Infrastructure, Server) -> Fut,
    Fut: Future<Output = AppResult<Router>>,
{
    let config = AppConfig::load(config_dir)?;

    init_runtime(&config);

    info!("Starting {} service", config.app_name);

    let metrics = Arc::new(MetricsRecorder::new());

    let infra = Infrastructure::from_config(config.clone()).await?;

    let health_checker = Arc::new(HealthChecker::new());
    health_checker.set_infrastructure(infra.clone()).await;

    let pool_collector = PoolMetricsCollector::default();
    pool_collector.set_infrastructure(infra.clone()).await;
    let _metrics_handle = pool_collector.start();

    let health_port = config.server.port + 1000;
    let health_server = HealthServer::new(health_checker.clone(), metrics.clone(), health_port);
    let health_handle = tokio::spawn(async move {
        if let Err(e) = health_server.serve().await {
            error!("Health server error: {}", e);
        }
    });

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    let router = server_builder(infra, Server::builder()).await?;

    info!(%addr, "gRPC server starting");

    router.serve_with_shutdown(addr, shutdown_signal()).await?;

    health_handle.abort();

    info!("Service stopped");

    Ok(())
}
