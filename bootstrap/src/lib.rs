//! bootstrap - 统一服务启动骨架
//!
//! 服务复用的启动逻辑：配置、日志、数据库、健康检查、指标与优雅关闭

mod health;
mod infrastructure;
mod metrics;
mod reflection;
mod runtime;
mod starter;

pub use health::*;
pub use infrastructure::*;
pub use self::metrics::*;
pub use reflection::*;
pub use runtime::*;
pub use starter::*;
