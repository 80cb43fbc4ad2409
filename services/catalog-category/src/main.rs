//! catalog-category service binary

use std::sync::Arc;

use catalog_adapter_postgres::MigrationManager;
use catalog_bootstrap::{Infrastructure, run_server};
use catalog_errors::AppError;
use tonic_reflection::server::Builder as ReflectionBuilder;
use tracing::info;

use catalog_category::FILE_DESCRIPTOR_SET;
use catalog_category::api::CategoryServiceImpl;
use catalog_category::application::ServiceHandler;
use catalog_category::infrastructure::persistence::{PostgresCategoryRepository, migrations};
use catalog_category::proto::category_service_server::CategoryServiceServer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    run_server("config", |infra: Infrastructure, mut server| async move {
        info!("Initializing catalog-category service...");

        let pool = infra.postgres_pool();

        MigrationManager::new(pool.clone())
            .run(&migrations())
            .await?;
        info!("Database migrations applied");

        let repo = Arc::new(PostgresCategoryRepository::new(pool));
        let handler = Arc::new(ServiceHandler::new(repo));
        let service = CategoryServiceImpl::new(handler);

        let reflection_service = ReflectionBuilder::configure()
            .register_encoded_file_descriptor_set(FILE_DESCRIPTOR_SET)
            .build_v1()
            .map_err(|e| AppError::internal(format!("Failed to build reflection service: {}", e)))?;

        Ok(server
            .add_service(reflection_service)
            .add_service(CategoryServiceServer::new(service)))
    })
    .await
}
