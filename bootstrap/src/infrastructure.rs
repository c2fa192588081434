//! 基础设施资源管理
//!
//! 持有服务共享的数据库连接池，启动时创建一次，按引用传给各请求处理器

use adapter_postgres::{PostgresConfig, TableDefinition, check_connection, create_pool, ensure_table};
use config::AppConfig;
use errors::AppResult;
use sqlx::PgPool;
use tracing::info;

/// PostgreSQL 连接池状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStatus {
    pub size: u32,
    pub idle: u32,
    pub active: u32,
}

/// 基础设施资源容器
#[derive(Clone)]
pub struct Infrastructure {
    /// PostgreSQL 连接池
    postgres_pool: PgPool,
}

impl Infrastructure {
    /// 从配置创建基础设施资源
    ///
    /// 连接或连通性校验失败时直接返回错误，由调用方终止进程
    pub async fn from_config(config: &AppConfig) -> AppResult<Self> {
        let db = &config.database;
        let pg_config = PostgresConfig::new(
            &db.host,
            db.port,
            &db.user,
            db.password.clone(),
            &db.name,
        )
        .with_max_connections(db.max_connections);

        let postgres_pool = create_pool(&pg_config).await?;
        check_connection(&postgres_pool).await?;
        info!(
            host = %db.host,
            port = db.port,
            database = %db.name,
            max_connections = db.max_connections,
            "Connected to the database"
        );

        Ok(Self { postgres_pool })
    }

    /// 确保服务依赖的表存在
    pub async fn ensure_tables(&self, tables: &[TableDefinition]) -> AppResult<()> {
        for table in tables {
            ensure_table(&self.postgres_pool, table).await?;
        }
        Ok(())
    }

    /// 获取 PostgreSQL 连接池
    pub fn postgres_pool(&self) -> PgPool {
        self.postgres_pool.clone()
    }

    /// 获取 PostgreSQL 连接池状态
    pub fn postgres_pool_status(&self) -> PoolStatus {
        let pool = &self.postgres_pool;
        let idle = pool.num_idle() as u32;
        PoolStatus {
            size: pool.size(),
            idle,
            active: pool.size().saturating_sub(idle),
        }
    }
}
