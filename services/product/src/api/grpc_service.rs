//! gRPC service implementation

use std::pin::Pin;
use std::sync::Arc;

use bootstrap::RequestTimer;
use errors::AppError;
use futures::{Stream, StreamExt};
use tonic::{Request, Response, Status, Streaming};

use crate::application::{BATCH_RESULT_MESSAGE, ProductHandler};
use crate::domain::entities::ProductId;
use crate::proto::product_service_server::ProductService;
use crate::proto::*;

use super::proto_converters::*;

const SERVICE: &str = "product.v1.ProductService";

pub struct ProductServiceImpl {
    handler: Arc<ProductHandler>,
}

impl ProductServiceImpl {
    pub fn new(handler: Arc<ProductHandler>) -> Self {
        Self { handler }
    }
}

#[tonic::async_trait]
impl ProductService for ProductServiceImpl {
    async fn create_product(
        &self,
        request: Request<CreateProductRequest>,
    ) -> Result<Response<CreateProductResponse>, Status> {
        let timer = RequestTimer::new(SERVICE, "CreateProduct");
        let req = request.into_inner();

        let result = self
            .handler
            .create_product(draft_from_proto(req.product))
            .await
            .map(|product| {
                Response::new(CreateProductResponse {
                    product: Some(product_to_proto(&product)),
                })
            })
            .map_err(Status::from);

        timer.observe(&result);
        result
    }

    async fn get_product(
        &self,
        request: Request<GetProductRequest>,
    ) -> Result<Response<GetProductResponse>, Status> {
        let timer = RequestTimer::new(SERVICE, "GetProduct");
        let id = ProductId(request.into_inner().product_id);

        let result = self
            .handler
            .get_product(id)
            .await
            .map(|product| {
                Response::new(GetProductResponse {
                    product: Some(product_to_proto(&product)),
                })
            })
            .map_err(Status::from);

        timer.observe(&result);
        result
    }

    async fn edit_product(
        &self,
        request: Request<EditProductRequest>,
    ) -> Result<Response<EditProductResponse>, Status> {
        let timer = RequestTimer::new(SERVICE, "EditProduct");
        let req = request.into_inner();
        let id = id_from_proto(req.product.as_ref());

        let result = self
            .handler
            .edit_product(id, draft_from_proto(req.product))
            .await
            .map(|product| {
                Response::new(EditProductResponse {
                    product: Some(product_to_proto(&product)),
                })
            })
            .map_err(Status::from);

        timer.observe(&result);
        result
    }

    async fn delete_product(
        &self,
        request: Request<DeleteProductRequest>,
    ) -> Result<Response<DeleteProductResponse>, Status> {
        let timer = RequestTimer::new(SERVICE, "DeleteProduct");
        let id = ProductId(request.into_inner().product_id);

        let result = self
            .handler
            .delete_product(id)
            .await
            .map(|id| Response::new(DeleteProductResponse { product_id: id.0 }))
            .map_err(Status::from);

        timer.observe(&result);
        result
    }

    type GetProductsStream =
        Pin<Box<dyn Stream<Item = Result<GetProductsResponse, Status>> + Send + 'static>>;

    async fn get_products(
        &self,
        _request: Request<GetProductsRequest>,
    ) -> Result<Response<Self::GetProductsStream>, Status> {
        let timer = RequestTimer::new(SERVICE, "GetProducts");
        let handler = self.handler.clone();

        // 逐行转发，由传输层的背压驱动数据库游标
        let output = async_stream::stream! {
            let products = handler.list_products();
            futures::pin_mut!(products);
            let mut outcome: Result<(), Status> = Ok(());

            while let Some(item) = products.next().await {
                match item {
                    Ok(product) => {
                        yield Ok(GetProductsResponse {
                            product: Some(product_to_proto(&product)),
                        });
                    }
                    Err(e) => {
                        let status = Status::from(e);
                        outcome = Err(status.clone());
                        yield Err(status);
                        break;
                    }
                }
            }

            timer.observe(&outcome);
        };

        Ok(Response::new(Box::pin(output) as Self::GetProductsStream))
    }

    async fn create_batch_product(
        &self,
        request: Request<Streaming<CreateBatchProductRequest>>,
    ) -> Result<Response<CreateBatchProductResponse>, Status> {
        let timer = RequestTimer::new(SERVICE, "CreateBatchProduct");
        let drafts = request.into_inner().map(|message| {
            message
                .map(|req| draft_from_proto(req.product))
                .map_err(|status| {
                    AppError::internal(format!("insert batch failed: {}", status.message()))
                })
        });

        let result = self
            .handler
            .create_batch(drafts)
            .await
            .map(|inserted| {
                Response::new(CreateBatchProductResponse {
                    batch_result: BATCH_RESULT_MESSAGE.to_string(),
                    inserted_count: inserted_count_to_proto(inserted),
                })
            })
            .map_err(Status::from);

        timer.observe(&result);
        result
    }
}
