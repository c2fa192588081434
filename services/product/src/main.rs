//! product-service - Product CRUD over gRPC

use std::sync::Arc;

use bootstrap::{Infrastructure, build_reflection, run_server};
use errors::AppError;
use tracing::info;

use product_service::FILE_DESCRIPTOR_SET;
use product_service::api::ProductServiceImpl;
use product_service::application::ProductHandler;
use product_service::infrastructure::persistence::{PRODUCTS_TABLE, PostgresProductRepository};
use product_service::proto::product_service_server::ProductServiceServer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    run_server("config", |infra: Infrastructure, mut server| async move {
        info!("Initializing product service...");

        infra.ensure_tables(&[PRODUCTS_TABLE]).await?;

        let repo = Arc::new(PostgresProductRepository::new(infra.postgres_pool()));
        let handler = Arc::new(ProductHandler::new(repo));
        let service = ProductServiceImpl::new(handler);

        let reflection_service = build_reflection(&[FILE_DESCRIPTOR_SET])?;

        Ok::<_, AppError>(
            server
                .add_service(ProductServiceServer::new(service))
                .add_service(reflection_service),
        )
    })
    .await
}
