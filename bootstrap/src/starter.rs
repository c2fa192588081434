//! 服务启动器
//!
//! 提供统一的服务启动模式

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use config::AppConfig;
use errors::{AppError, AppResult};
use tonic::transport::Server;
use tonic::transport::server::Router;
use tracing::{error, info};

use crate::health::{HealthChecker, HealthServer};
use crate::infrastructure::Infrastructure;
use crate::metrics::{MetricsRecorder, PoolMetricsCollector};
use crate::runtime::{init_runtime, shutdown_signal};

/// 健康检查端口相对 gRPC 端口的偏移
pub const HEALTH_PORT_OFFSET: u16 = 1000;

/// 运行 gRPC 服务
///
/// 所有服务的统一入口点。它负责：
/// 1. 加载配置（`.env`、配置文件、环境变量）
/// 2. 初始化运行时（日志）
/// 3. 创建基础设施资源（数据库连接池），失败即退出
/// 4. 启动健康检查 HTTP 服务器与连接池 metrics 采集器
/// 5. 调用用户提供的闭包注册 gRPC 服务
/// 6. 启动服务器，收到中断信号后停止接收新请求并等待进行中的请求结束
///
/// # 示例
///
/// ```ignore
/// run_server("config", |infra, mut server| async move {
///     let service = MyServiceImpl::new(infra.postgres_pool());
///     Ok(server.add_service(MyServiceServer::new(service)))
/// })
/// .await
/// ```
pub async fn run_server<F, Fut>(
    config_dir: &str,
    server_builder: F,
) -> Result<(), Box<dyn std::error::Error>>
where
    F: FnOnce(Infrastructure, Server) -> Fut,
    Fut: Future<Output = AppResult<Router>>,
{
    // 1. 加载配置
    dotenvy::dotenv().ok();
    let config = AppConfig::load(config_dir)?;

    // 2. 初始化运行时
    init_runtime(&config);

    info!("Starting {} service", config.app_name);

    // 3. 初始化 Metrics 记录器
    let metrics = Arc::new(MetricsRecorder::install()?);

    // 4. 创建基础设施
    let infra = Infrastructure::from_config(&config)
        .await
        .inspect_err(|e| error!("Failed to initialize infrastructure: {}", e))?;

    // 5. 启动连接池 metrics 采集器
    let pool_metrics = PoolMetricsCollector::new(infra.clone(), Duration::from_secs(15)).start();

    // 6. 启动健康检查 HTTP 服务器
    let health_port = config
        .server
        .port
        .checked_add(HEALTH_PORT_OFFSET)
        .ok_or_else(|| AppError::validation("server.port too large for health port offset"))?;
    let health_checker = Arc::new(HealthChecker::new(infra.postgres_pool()));
    let health_server = HealthServer::new(health_checker, metrics.clone(), health_port);

    let (shutdown_tx, mut shutdown_rx) = tokio::sync::watch::channel(false);
    let health_handle = tokio::spawn(async move {
        let shutdown = async move {
            let _ = shutdown_rx.changed().await;
        };
        if let Err(e) = health_server.serve(shutdown).await {
            error!("Health server error: {}", e);
        }
    });

    // 7. 构建服务地址
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    // 8. 注册 gRPC 服务
    let router = server_builder(infra, Server::builder())
        .await
        .inspect_err(|e| error!("Failed to build gRPC services: {}", e))?;

    info!(%addr, "gRPC server starting");

    // 9. 启动服务器
    let result = router
        .serve_with_shutdown(addr, async move {
            shutdown_signal().await;
            info!("Stopping the server");
            let _ = shutdown_tx.send(true);
        })
        .await;

    // 10. 清理
    pool_metrics.abort();
    if let Err(e) = health_handle.await {
        error!("Health server task failed: {}", e);
    }

    result?;
    info!("Service stopped");

    Ok(())
}
