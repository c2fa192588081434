//! 数据库行到领域对象的转换

use crate::domain::entities::{Product, ProductId};

use super::rows::ProductRow;

/// 将 ProductRow 转换为 Product，NULL 列取零值
pub fn product_from_row(row: ProductRow) -> Product {
    Product {
        id: ProductId(row.id),
        name: row.name.unwrap_or_default(),
        description: row.description.unwrap_or_default(),
        category: row.category,
        amount: row.amount.unwrap_or_default(),
    }
}
