//! Business logic handler

use std::sync::Arc;

use errors::{AppError, AppResult};
use futures::{Stream, StreamExt};
use tracing::{debug, error, info, warn};

use crate::domain::entities::{Product, ProductDraft, ProductId};
use crate::domain::repositories::ProductRepository;

/// 批量插入成功时的回执
pub const BATCH_RESULT_MESSAGE: &str = "All the data successfully inserted!";

pub struct ProductHandler {
    repo: Arc<dyn ProductRepository>,
}

impl ProductHandler {
    pub fn new(repo: Arc<dyn ProductRepository>) -> Self {
        Self { repo }
    }

    /// 创建商品，返回提交的字段和生成的 ID
    pub async fn create_product(&self, draft: ProductDraft) -> AppResult<Product> {
        let id = self
            .repo
            .insert(&draft)
            .await
            .inspect_err(|e| error!(name = %draft.name, "Insert product failed: {}", e))?;

        info!(product_id = %id, name = %draft.name, "Product created");
        Ok(Product::new(id, draft))
    }

    /// 获取商品，不存在时返回 NotFound
    pub async fn get_product(&self, id: ProductId) -> AppResult<Product> {
        let product = self
            .repo
            .find_by_id(id)
            .await
            .inspect_err(|e| error!(product_id = %id, "Get product failed: {}", e))?
            .ok_or_else(|| AppError::not_found(format!("Product {} not found", id)))?;

        debug!(product_id = %id, name = %product.name, "Product retrieved");
        Ok(product)
    }

    /// 整体替换商品字段
    ///
    /// 不做存在性检查，ID 不存在时同样返回提交的字段
    pub async fn edit_product(&self, id: ProductId, draft: ProductDraft) -> AppResult<Product> {
        let affected = self
            .repo
            .update(id, &draft)
            .await
            .inspect_err(|e| error!(product_id = %id, "Update product failed: {}", e))?;

        if affected == 0 {
            warn!(product_id = %id, "Edit matched no product");
        } else {
            info!(product_id = %id, "Product updated");
        }
        Ok(Product::new(id, draft))
    }

    /// 删除商品
    ///
    /// 不做存在性检查，ID 不存在时同样返回成功
    pub async fn delete_product(&self, id: ProductId) -> AppResult<ProductId> {
        let affected = self
            .repo
            .delete(id)
            .await
            .inspect_err(|e| error!(product_id = %id, "Delete product failed: {}", e))?;

        if affected == 0 {
            warn!(product_id = %id, "Delete matched no product");
        } else {
            info!(product_id = %id, "Product deleted");
        }
        Ok(id)
    }

    /// 按名称升序逐条产出商品
    ///
    /// 一条都没有时以 NotFound 结束；读取出错时产出该错误后结束
    pub fn list_products(&self) -> impl Stream<Item = AppResult<Product>> + Send + '_ {
        async_stream::stream! {
            let mut rows = self.repo.stream_by_name();
            let mut count: u64 = 0;

            while let Some(row) = rows.next().await {
                match row {
                    Ok(product) => {
                        count += 1;
                        yield Ok(product);
                    }
                    Err(e) => {
                        error!(count, "List products failed: {}", e);
                        yield Err(e);
                        return;
                    }
                }
            }

            if count == 0 {
                yield Err(AppError::not_found("Products not found"));
                return;
            }

            debug!(count, "Products listed");
        }
    }

    /// 逐条插入，直到输入结束
    ///
    /// 任意一条读取或插入失败都立即返回错误，已插入的行保留
    pub async fn create_batch<S>(&self, drafts: S) -> AppResult<u64>
    where
        S: Stream<Item = AppResult<ProductDraft>> + Send,
    {
        futures::pin_mut!(drafts);
        let mut inserted: u64 = 0;

        while let Some(draft) = drafts.next().await {
            let draft = draft.inspect_err(|e| error!(inserted, "Receive batch item failed: {}", e))?;
            let id = self.repo.insert(&draft).await.inspect_err(|e| {
                error!(inserted, name = %draft.name, "Insert batch item failed: {}", e)
            })?;
            inserted += 1;
            debug!(product_id = %id, name = %draft.name, "Batch item inserted");
        }

        info!(inserted, "Batch insert finished");
        Ok(inserted)
    }
}
