//! 数据库行映射结构

use sqlx::FromRow;

/// 商品数据库行
///
/// 除 `category` 外的列都允许 NULL
#[derive(Debug, FromRow)]
pub struct ProductRow {
    pub id: i32,
    pub amount: Option<i32>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: String,
}
