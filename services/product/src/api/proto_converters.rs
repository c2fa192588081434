//! Proto <-> Domain 转换

use tracing::warn;

use crate::domain::entities::{Product, ProductDraft, ProductId};
use crate::proto;

/// 从请求中的 proto 商品取出可写字段，缺省的商品视为全零值
pub fn draft_from_proto(product: Option<proto::Product>) -> ProductDraft {
    let product = product.unwrap_or_default();
    ProductDraft {
        name: product.name,
        description: product.description,
        category: product.category,
        amount: product.amount,
    }
}

/// 从请求中的 proto 商品取出 ID
pub fn id_from_proto(product: Option<&proto::Product>) -> ProductId {
    ProductId(product.map(|p| p.id).unwrap_or_default())
}

/// 领域商品转换为 proto 商品
pub fn product_to_proto(product: &Product) -> proto::Product {
    proto::Product {
        id: product.id.0,
        name: product.name.clone(),
        description: product.description.clone(),
        category: product.category.clone(),
        amount: product.amount,
    }
}

/// 可写字段转换为 proto 商品（客户端使用）
pub fn draft_to_proto(draft: &ProductDraft) -> proto::Product {
    proto::Product {
        id: 0,
        name: draft.name.clone(),
        description: draft.description.clone(),
        category: draft.category.clone(),
        amount: draft.amount,
    }
}

/// 批量插入条数转换为 proto 的 int32，超出范围时取 `i32::MAX`
pub fn inserted_count_to_proto(inserted: u64) -> i32 {
    i32::try_from(inserted).unwrap_or_else(|_| {
        warn!(inserted, "Inserted count exceeds int32 range, reporting i32::MAX");
        i32::MAX
    })
}
