//! Health endpoints
//!
//! Serves `/health` (liveness), `/ready` (readiness) and `/metrics` on a
//! separate HTTP port next to the gRPC listener.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use catalog_adapter_postgres::check_connection;
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use crate::Infrastructure;
use crate::metrics::MetricsRecorder;

/// Overall health status
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub checks: Vec<ComponentHealth>,
}

/// Health of a single component
#[derive(Debug, Clone, Serialize)]
pub struct ComponentHealth {
    pub name: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl HealthStatus {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            checks: vec![],
        }
    }

    pub fn unhealthy() -> Self {
        Self {
            status: "unhealthy".to_string(),
            checks: vec![],
        }
    }

    pub fn add_check(&mut self, check: ComponentHealth) {
        if check.status != "healthy" {
            self.status = "unhealthy".to_string();
        }
        self.checks.push(check);
    }

    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

impl ComponentHealth {
    pub fn healthy(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: "healthy".to_string(),
            message: None,
        }
    }

    pub fn unhealthy(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: "unhealthy".to_string(),
            message: Some(message.into()),
        }
    }
}

/// Runs liveness and readiness probes against the infrastructure
pub struct HealthChecker {
    infra: Arc<RwLock<Option<Infrastructure>>>,
}

impl HealthChecker {
    pub fn new() -> Self {
        Self {
            infra: Arc::new(RwLock::new(None)),
        }
    }

    pub async fn set_infrastructure(&self, infra: Infrastructure) {
        let mut guard = self.infra.write().await;
        *guard = Some(infra);
    }

    /// Liveness: the process is up, dependencies are not consulted
    pub async fn liveness(&self) -> HealthStatus {
        HealthStatus::healthy()
    }

    /// Readiness: all dependencies answer
    pub async fn readiness(&self) -> HealthStatus {
        let guard = self.infra.read().await;
        let infra = match guard.as_ref() {
            Some(i) => i,
            None => {
                let mut status = HealthStatus::unhealthy();
                status.add_check(ComponentHealth::unhealthy(
                    "infrastructure",
                    "Not initialized",
                ));
                return status;
            }
        };

        let mut status = HealthStatus::healthy();
        status.add_check(self.check_postgres(infra).await);
        status
    }

    async fn check_postgres(&self, infra: &Infrastructure) -> ComponentHealth {
        match check_connection(&infra.postgres_pool()).await {
            Ok(()) => ComponentHealth::healthy("postgres"),
            Err(e) => ComponentHealth::unhealthy("postgres", e.to_string()),
        }
    }
}

impl Default for HealthChecker {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
struct HealthState {
    checker: Arc<HealthChecker>,
    metrics: Arc<MetricsRecorder>,
}

/// HTTP server exposing health and metrics endpoints
pub struct HealthServer {
    checker: Arc<HealthChecker>,
    metrics: Arc<MetricsRecorder>,
    port: u16,
}

impl HealthServer {
    pub fn new(checker: Arc<HealthChecker>, metrics: Arc<MetricsRecorder>, port: u16) -> Self {
        Self {
            checker,
            metrics,
            port,
        }
    }

    pub async fn serve(self) -> std::io::Result<()> {
        let state = HealthState {
            checker: self.checker,
            metrics: self.metrics,
        };

        let app = Router::new()
            .route("/health", get(health_handler))
            .route("/ready", get(ready_handler))
            .route("/metrics", get(metrics_handler))
            .with_state(state);

        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        info!(%addr, "Health server starting");

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await
    }
}

async fn health_handler(State(state): State<HealthState>) -> impl IntoResponse {
    let status = state.checker.liveness().await;
    (StatusCode::OK, Json(status))
}

async fn ready_handler(State(state): State<HealthState>) -> impl IntoResponse {
    let status = state.checker.readiness().await;
    let code = if status.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(status))
}

async fn metrics_handler(State(state): State<HealthState>) -> String {
    state.metrics.render()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_degrades_on_unhealthy_check() {
        let mut status = HealthStatus::healthy();
        assert!(status.is_healthy());

        status.add_check(ComponentHealth::healthy("postgres"));
        assert!(status.is_healthy());

        status.add_check(ComponentHealth::unhealthy("postgres", "connection refused"));
        assert!(!status.is_healthy());
    }

    #[tokio::test]
    async fn test_readiness_without_infrastructure() {
        let checker = HealthChecker::new();
        let status = checker.readiness().await;
        assert!(!status.is_healthy());
    }
}
