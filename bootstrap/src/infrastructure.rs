//! Infrastructure resource management

use catalog_adapter_postgres::{PostgresConfig, create_pool};
use catalog_config::AppConfig;
use catalog_errors::AppResult;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use tracing::info;

use crate::retry::{RetryConfig, with_retry};

/// Shared infrastructure resources, created once at startup.
///
/// Cloning is cheap: `PgPool` is an `Arc` around the actual pool.
#[derive(Clone)]
pub struct Infrastructure {
    config: AppConfig,
    postgres_pool: PgPool,
}

impl Infrastructure {
    /// Create infrastructure resources from configuration (with retry)
    pub async fn from_config(config: AppConfig) -> AppResult<Self> {
        let retry_config = RetryConfig::default();

        let pg_config = PostgresConfig::new(config.database.url.expose_secret())
            .with_max_connections(config.database.max_connections);
        let postgres_pool = with_retry(&retry_config, "PostgreSQL connection", || {
            let cfg = pg_config.clone();
            async move { create_pool(&cfg).await }
        })
        .await?;
        info!(
            max_connections = config.database.max_connections,
            "PostgreSQL connection pool created"
        );

        Ok(Self {
            config,
            postgres_pool,
        })
    }

    /// Build infrastructure around an existing pool (used by tests)
    pub fn with_pool(config: AppConfig, pool: PgPool) -> Self {
        Self {
            config,
            postgres_pool: pool,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn postgres_pool(&self) -> PgPool {
        self.postgres_pool.clone()
    }
}
