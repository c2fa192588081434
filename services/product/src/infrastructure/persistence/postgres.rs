//! PostgreSQL repository implementation

use adapter_postgres::TableDefinition;
use async_trait::async_trait;
use bootstrap::DbQueryTimer;
use errors::{AppError, AppResult};
use futures::stream::{BoxStream, StreamExt};
use sqlx::PgPool;

use crate::domain::entities::{Product, ProductDraft, ProductId};
use crate::domain::repositories::ProductRepository;

use super::converters::product_from_row;
use super::rows::ProductRow;

const TABLE: &str = "products";

/// 商品表
pub const PRODUCTS_TABLE: TableDefinition = TableDefinition {
    name: TABLE,
    create_sql: r#"
        CREATE TABLE IF NOT EXISTS products (
            id SERIAL PRIMARY KEY,
            amount integer,
            name text UNIQUE,
            description text,
            category text NOT NULL
        )
    "#,
};

pub struct PostgresProductRepository {
    pool: PgPool,
}

impl PostgresProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for PostgresProductRepository {
    async fn insert(&self, draft: &ProductDraft) -> AppResult<ProductId> {
        let timer = DbQueryTimer::new("insert", TABLE);
        let result = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO products (name, description, category, amount)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(&draft.category)
        .bind(draft.amount)
        .fetch_one(&self.pool)
        .await;
        timer.finish(result.is_ok());

        let id = result.map_err(|e| AppError::database(format!("插入商品失败: {}", e)))?;
        Ok(ProductId(id))
    }

    async fn find_by_id(&self, id: ProductId) -> AppResult<Option<Product>> {
        let timer = DbQueryTimer::new("select", TABLE);
        let result = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, amount, name, description, category
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(result.is_ok());

        let row = result.map_err(|e| AppError::database(format!("查询商品失败: {}", e)))?;
        Ok(row.map(product_from_row))
    }

    async fn update(&self, id: ProductId, draft: &ProductDraft) -> AppResult<u64> {
        let timer = DbQueryTimer::new("update", TABLE);
        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = $1,
                description = $2,
                category = $3,
                amount = $4
            WHERE id = $5
            "#,
        )
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(&draft.category)
        .bind(draft.amount)
        .bind(id.0)
        .execute(&self.pool)
        .await;
        timer.finish(result.is_ok());

        let result = result.map_err(|e| AppError::database(format!("更新商品失败: {}", e)))?;
        Ok(result.rows_affected())
    }

    async fn delete(&self, id: ProductId) -> AppResult<u64> {
        let timer = DbQueryTimer::new("delete", TABLE);
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await;
        timer.finish(result.is_ok());

        let result = result.map_err(|e| AppError::database(format!("删除商品失败: {}", e)))?;
        Ok(result.rows_affected())
    }

    fn stream_by_name(&self) -> BoxStream<'_, AppResult<Product>> {
        sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, amount, name, description, category
            FROM products
            ORDER BY name
            "#,
        )
        .fetch(&self.pool)
        .map(|row| {
            row.map(product_from_row)
                .map_err(|e| AppError::database(format!("查询商品列表失败: {}", e)))
        })
        .boxed()
    }
}
