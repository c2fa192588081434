//! 商品仓储接口

use async_trait::async_trait;
use errors::AppResult;
use futures::stream::BoxStream;

use crate::domain::entities::{Product, ProductDraft, ProductId};

/// 商品仓储接口
///
/// 每个方法只执行一条 SQL 语句，不开启事务
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// 插入商品，返回生成的 ID
    async fn insert(&self, draft: &ProductDraft) -> AppResult<ProductId>;

    /// 根据 ID 查找商品
    async fn find_by_id(&self, id: ProductId) -> AppResult<Option<Product>>;

    /// 整体替换商品字段，返回受影响的行数
    async fn update(&self, id: ProductId, draft: &ProductDraft) -> AppResult<u64>;

    /// 删除商品，返回受影响的行数
    async fn delete(&self, id: ProductId) -> AppResult<u64>;

    /// 按名称升序逐行读取全部商品
    fn stream_by_name(&self) -> BoxStream<'_, AppResult<Product>>;
}
