//! product-client - 演示客户端
//!
//! 依次调用商品服务的每个接口一次：
//! 创建 → 查询 → 修改 → 删除 → 列表 → 批量创建

use telemetry::init_tracing;
use tonic::transport::Channel;
use tonic::{Code, Status};
use tracing::info;

use product_service::api::draft_to_proto;
use product_service::domain::entities::ProductDraft;
use product_service::proto::product_service_client::ProductServiceClient;
use product_service::proto::*;

const DEFAULT_ADDR: &str = "http://localhost:50051";

type Client = ProductServiceClient<Channel>;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing("info");

    let addr = std::env::var("PRODUCT_SERVICE_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    info!(%addr, "Client of product service");

    let mut client = ProductServiceClient::connect(addr).await?;

    let created = create_product(&mut client).await?;
    get_product(&mut client, created.id).await?;
    edit_product(&mut client, created.id).await?;
    delete_product(&mut client, created.id).await?;
    get_all_products(&mut client).await?;
    create_batch_product(&mut client).await?;

    Ok(())
}

async fn create_product(client: &mut Client) -> Result<Product, Status> {
    info!("Create a product");
    let draft = ProductDraft::new("Sample product", "A sample product", "Gadget", 100);

    let response = client
        .create_product(CreateProductRequest {
            product: Some(draft_to_proto(&draft)),
        })
        .await?
        .into_inner();

    info!(?response, "Product created");
    response
        .product
        .ok_or_else(|| Status::internal("Create response carries no product"))
}

async fn get_product(client: &mut Client, product_id: i32) -> Result<(), Status> {
    info!(product_id, "Get product data by ID");
    let response = client
        .get_product(GetProductRequest { product_id })
        .await?
        .into_inner();

    info!(?response, "Product data");
    Ok(())
}

async fn edit_product(client: &mut Client, product_id: i32) -> Result<(), Status> {
    info!(product_id, "Update a product");
    let mut product = draft_to_proto(&ProductDraft::new(
        "Sample Edited product",
        "An edited product",
        "Books",
        100,
    ));
    product.id = product_id;

    let response = client
        .edit_product(EditProductRequest {
            product: Some(product),
        })
        .await?
        .into_inner();

    info!(?response, "Product updated");
    Ok(())
}

async fn delete_product(client: &mut Client, product_id: i32) -> Result<(), Status> {
    info!(product_id, "Delete a product");
    let response = client
        .delete_product(DeleteProductRequest { product_id })
        .await?
        .into_inner();

    info!(?response, "Product deleted");
    Ok(())
}

/// 列表为空时服务端返回 NOT_FOUND，这里只记录不中止
async fn get_all_products(client: &mut Client) -> Result<(), Status> {
    info!("All products data");
    let mut stream = match client.get_products(GetProductsRequest {}).await {
        Ok(response) => response.into_inner(),
        Err(status) if status.code() == Code::NotFound => {
            info!("No products found");
            return Ok(());
        }
        Err(status) => return Err(status),
    };

    loop {
        match stream.message().await {
            Ok(Some(response)) => info!(product = ?response.product, "Product"),
            Ok(None) => break,
            Err(status) if status.code() == Code::NotFound => {
                info!("No products found");
                break;
            }
            Err(status) => return Err(status),
        }
    }

    Ok(())
}

async fn create_batch_product(client: &mut Client) -> Result<(), Status> {
    let requests: Vec<CreateBatchProductRequest> = [
        ProductDraft::new("Sample product one", "A sample product one", "Gadget", 100),
        ProductDraft::new("Sample product two", "A sample product two", "Books", 100),
        ProductDraft::new("Sample product three", "A sample product three", "Foods", 100),
    ]
    .iter()
    .map(|draft| CreateBatchProductRequest {
        product: Some(draft_to_proto(draft)),
    })
    .collect();

    for request in &requests {
        info!(?request, "Sending request");
    }

    let response = client
        .create_batch_product(futures::stream::iter(requests))
        .await?
        .into_inner();

    info!(?response, "Create batch product result");
    Ok(())
}
