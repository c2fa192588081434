//! 表结构初始化
//!
//! 只负责 `CREATE TABLE IF NOT EXISTS`，不做版本化迁移

use errors::{AppError, AppResult};
use sqlx::PgPool;
use tracing::info;

/// 表定义
#[derive(Debug, Clone, Copy)]
pub struct TableDefinition {
    /// 表名（仅用于日志和错误信息）
    pub name: &'static str,
    /// 建表语句，必须是幂等的
    pub create_sql: &'static str,
}

/// 确保表存在
pub async fn ensure_table(pool: &PgPool, table: &TableDefinition) -> AppResult<()> {
    sqlx::query(table.create_sql)
        .execute(pool)
        .await
        .map_err(|e| {
            AppError::database(format!("Failed to create table {}: {}", table.name, e))
        })?;

    info!(table = table.name, "Table ensured");
    Ok(())
}
