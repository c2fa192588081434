//! config - 配置加载库
//!
//! 配置来源（后者覆盖前者）：
//! 1. `{config_dir}/default.toml`
//! 2. `{config_dir}/{APP_ENV}.toml`
//! 3. `APP_*` 环境变量
//! 4. `DB_*` 环境变量（映射到 `database.*`）
//! 5. `LOG_LEVEL` 环境变量

use std::collections::BTreeMap;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::Deserialize;
use thiserror::Error;

use secrecy::Secret;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    Load(#[from] figment::Error),
}

/// 数据库配置
///
/// host/port/user/password/name 没有默认值，缺失时加载失败
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: Secret<String>,
    pub name: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

/// 按原样读取的 `DB_*` 变量
///
/// figment 的 `Env` 会把 `12345`、`007` 之类的值解析成数字，
/// 这些字段必须保留原始字符串
const RAW_DB_KEYS: [&str; 4] = ["host", "user", "password", "name"];

fn default_max_connections() -> u32 {
    10
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
}

fn default_server_host() -> String {
    "0.0.0.0".to_string()
}

fn default_server_port() -> u16 {
    50051
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
        }
    }
}

/// 遥测配置
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_app_name")]
    pub app_name: String,
    #[serde(default = "default_app_env")]
    pub app_env: String,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

fn default_app_name() -> String {
    "product-service".to_string()
}

fn default_app_env() -> String {
    "development".to_string()
}

impl AppConfig {
    /// 从配置文件和环境变量加载配置
    pub fn load(config_dir: &str) -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| default_app_env());

        let config: Self = Self::figment(config_dir, &env).extract()?;

        Ok(config)
    }

    fn figment(config_dir: &str, env: &str) -> Figment {
        Figment::new()
            .merge(Toml::file(format!("{}/default.toml", config_dir)))
            .merge(Toml::file(format!("{}/{}.toml", config_dir, env)))
            .merge(
                Env::prefixed("APP_")
                    .map(|key| format!("app_{}", key.as_str().to_ascii_lowercase()).into()),
            )
            .merge(
                Env::prefixed("DB_")
                    .ignore(&RAW_DB_KEYS)
                    .map(|key| format!("database.{}", key.as_str().to_ascii_lowercase()).into()),
            )
            .merge(Serialized::default("database", raw_db_env()))
            .merge(
                Env::raw()
                    .only(&["LOG_LEVEL"])
                    .map(|_| "telemetry.log_level".into()),
            )
    }

    /// 是否为生产环境
    pub fn is_production(&self) -> bool {
        self.app_env == "production"
    }
}

fn raw_db_env() -> BTreeMap<&'static str, String> {
    RAW_DB_KEYS
        .iter()
        .filter_map(|key| {
            let var = format!("DB_{}", key.to_ascii_uppercase());
            std::env::var(var).ok().map(|value| (*key, value))
        })
        .collect()
}
