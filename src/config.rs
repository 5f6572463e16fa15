//! Copyright (c) 2025, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了缓存系统的配置结构和解析逻辑。

use crate::error::{CacheError, Result};
use secrecy::SecretString;
use serde::Deserialize;
use std::path::Path;

pub const CONFIG_VERSION: u32 = 1;
pub const CONFIG_VERSION_FIELD: &str = "config_version";

const MAX_NAMESPACE_PREFIX_LEN: usize = 64;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_version: Option<u32>,
    #[serde(default)]
    pub global: GlobalConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

/// 全局配置
///
/// 定义适用于所有文档类型的默认配置
#[derive(Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct GlobalConfig {
    /// 命名空间前缀，拼接在类型名之前
    pub namespace_prefix: String,
    /// 快照序列化类型
    pub serialization: SerializationType,
}

/// 序列化类型枚举
#[derive(Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SerializationType {
    /// JSON序列化
    #[default]
    Json,
}

/// 存储配置
///
/// 定义Redis连接（或内存存储）的相关配置
#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct StoreConfig {
    /// 存储模式
    pub mode: StoreMode,
    /// 连接字符串
    pub connection_string: SecretString,
    /// 连接超时时间（毫秒）
    pub connection_timeout_ms: u64,
    /// 命令执行超时时间（毫秒）
    pub command_timeout_ms: u64,
    /// Redis 密码（可选，使用 SecretString 保护）
    pub password: Option<SecretString>,
    /// 是否启用 TLS
    pub enable_tls: bool,
    /// 哨兵配置
    pub sentinel: Option<SentinelConfig>,
    /// 集群配置
    pub cluster: Option<ClusterConfig>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            mode: StoreMode::Standalone,
            connection_string: SecretString::new("redis://127.0.0.1:6379".to_string().into()),
            connection_timeout_ms: 5000,
            command_timeout_ms: 3000,
            password: None,
            enable_tls: false,
            sentinel: None,
            cluster: None,
        }
    }
}

/// 哨兵配置
#[derive(Deserialize, Clone, Debug)]
pub struct SentinelConfig {
    /// 主节点名称
    pub master_name: String,
    /// 哨兵节点列表
    pub nodes: Vec<String>,
}

/// 集群配置
#[derive(Deserialize, Clone, Debug)]
pub struct ClusterConfig {
    /// 初始节点列表
    pub nodes: Vec<String>,
}

/// 存储模式枚举
#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreMode {
    /// 单机模式
    #[default]
    Standalone,
    /// 哨兵模式
    Sentinel,
    /// 集群模式
    Cluster,
    /// 进程内存储，不连接Redis
    Memory,
}

impl Config {
    /// 从TOML字符串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| CacheError::ConfigError(e.to_string()))
    }

    /// 从TOML文件加载配置
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// 验证配置
    ///
    /// 检查配置的有效性，确保所有必需的字段都已设置，并且值在合理范围内
    pub fn validate(&self) -> std::result::Result<(), String> {
        if let Some(version) = &self.config_version {
            if *version > CONFIG_VERSION {
                return Err(format!(
                    "Configuration version {} is not supported. Current version is {}.",
                    version, CONFIG_VERSION
                ));
            }
        }

        if self.global.namespace_prefix.len() > MAX_NAMESPACE_PREFIX_LEN {
            return Err(format!(
                "namespace_prefix exceeds maximum length of {} characters",
                MAX_NAMESPACE_PREFIX_LEN
            ));
        }

        let store = &self.store;
        if store.mode == StoreMode::Memory {
            return Ok(());
        }

        if !(100..=30000).contains(&store.connection_timeout_ms) {
            return Err("connection_timeout_ms must be between 100 and 30000 ms".to_string());
        }

        if !(100..=60000).contains(&store.command_timeout_ms) {
            return Err("command_timeout_ms must be between 100 and 60000 ms".to_string());
        }

        match store.mode {
            StoreMode::Sentinel => match &store.sentinel {
                None => return Err("Sentinel mode requires a [store.sentinel] section".to_string()),
                Some(s) if s.nodes.is_empty() => {
                    return Err("Sentinel node list cannot be empty".to_string())
                }
                Some(s) if s.master_name.is_empty() => {
                    return Err("Sentinel master_name cannot be empty".to_string())
                }
                Some(_) => {}
            },
            StoreMode::Cluster => match &store.cluster {
                None => return Err("Cluster mode requires a [store.cluster] section".to_string()),
                Some(c) if c.nodes.is_empty() => {
                    return Err("Cluster node list cannot be empty".to_string())
                }
                Some(_) => {}
            },
            StoreMode::Standalone | StoreMode::Memory => {}
        }

        Ok(())
    }
}
