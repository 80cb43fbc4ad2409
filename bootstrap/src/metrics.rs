//! Prometheus metrics export

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use crate::Infrastructure;

/// Owns the installed Prometheus recorder
pub struct MetricsRecorder {
    handle: PrometheusHandle,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .expect("Failed to install Prometheus recorder");

        Self { handle }
    }

    /// Render metrics in the Prometheus exposition format
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

/// Record a completed gRPC request
pub fn record_grpc_request(service: &str, method: &str, status: &str, duration_ms: f64) {
    let labels = [
        ("service", service.to_string()),
        ("method", method.to_string()),
        ("status", status.to_string()),
    ];

    counter!("grpc_requests_total", &labels).increment(1);
    histogram!("grpc_request_duration_ms", &labels).record(duration_ms);
}

/// Record a database query
pub fn record_db_query(operation: &str, table: &str, duration_ms: f64, success: bool) {
    let labels = [
        ("operation", operation.to_string()),
        ("table", table.to_string()),
        ("success", success.to_string()),
    ];

    counter!("db_queries_total", &labels).increment(1);
    histogram!("db_query_duration_ms", &labels).record(duration_ms);
}

/// Periodically samples connection pool gauges
pub struct PoolMetricsCollector {
    interval: Duration,
    infra: Arc<RwLock<Option<Infrastructure>>>,
}

impl PoolMetricsCollector {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            infra: Arc::new(RwLock::new(None)),
        }
    }

    pub async fn set_infrastructure(&self, infra: Infrastructure) {
        let mut guard = self.infra.write().await;
        *guard = Some(infra);
    }

    /// Spawn the sampling loop
    pub fn start(&self) -> JoinHandle<()> {
        let infra = self.infra.clone();
        let interval = self.interval;

        tokio::spawn(async move {
            loop {
                {
                    let guard = infra.read().await;
                    if let Some(infra) = guard.as_ref() {
                        let pool = infra.postgres_pool();
                        gauge!("db_pool_size").set(pool.size() as f64);
                        gauge!("db_pool_idle").set(pool.num_idle() as f64);
                    }
                }
                tokio::time::sleep(interval).await;
            }
        })
    }
}

impl Default for PoolMetricsCollector {
    fn default() -> Self {
        Self::new(Duration::from_secs(10))
    }
}
