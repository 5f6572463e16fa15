//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了基于Redis哈希的存储后端。
//!
//! 每个命名空间映射为一个Redis哈希键，字段缓存和对象快照都是该哈希中的字段。

use super::redis_provider::{DefaultRedisProvider, RedisProvider};
use super::HashStore;
use crate::config::{StoreConfig, StoreMode};
use crate::error::{CacheError, Result};
use async_trait::async_trait;
use redis::{
    aio::ConnectionManager, cluster_async::ClusterConnection, Cmd, ErrorKind, FromRedisValue,
    RedisError, RedisResult,
};
use std::sync::Arc;
use tokio::time::{timeout, Duration};
use tracing::{debug, instrument};

/// Redis存储后端
///
/// 连接句柄可被克隆并在所有类型与实例之间共享
#[derive(Clone)]
pub enum RedisStore {
    Standalone {
        manager: ConnectionManager,
        command_timeout_ms: u64,
    },
    Cluster {
        connection: ClusterConnection,
        command_timeout_ms: u64,
    },
}

impl std::fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Standalone { .. } => write!(f, "RedisStore::Standalone"),
            Self::Cluster { .. } => write!(f, "RedisStore::Cluster"),
        }
    }
}

impl RedisStore {
    /// 根据配置建立连接
    #[instrument(skip(config), level = "info", name = "init_redis_store")]
    pub async fn new(config: &StoreConfig) -> Result<Self> {
        Self::new_with_provider(config, Arc::new(DefaultRedisProvider)).await
    }

    /// 使用指定的连接提供者建立连接
    #[instrument(skip(config, provider), level = "info", fields(mode = ?config.mode))]
    pub async fn new_with_provider(
        config: &StoreConfig,
        provider: Arc<dyn RedisProvider>,
    ) -> Result<Self> {
        debug!("Initializing RedisStore with mode: {:?}", config.mode);
        let command_timeout_ms = config.command_timeout_ms;
        match config.mode {
            StoreMode::Standalone => Ok(RedisStore::Standalone {
                manager: provider.connect_standalone(config).await?,
                command_timeout_ms,
            }),
            StoreMode::Sentinel => Ok(RedisStore::Standalone {
                manager: provider.connect_sentinel(config).await?,
                command_timeout_ms,
            }),
            StoreMode::Cluster => Ok(RedisStore::Cluster {
                connection: provider.connect_cluster(config).await?,
                command_timeout_ms,
            }),
            StoreMode::Memory => Err(CacheError::ConfigError(
                "Memory mode does not use a Redis connection".to_string(),
            )),
        }
    }

    /// 获取命令超时时间（毫秒）
    pub fn command_timeout_ms(&self) -> u64 {
        match self {
            RedisStore::Standalone {
                command_timeout_ms, ..
            }
            | RedisStore::Cluster {
                command_timeout_ms, ..
            } => *command_timeout_ms,
        }
    }

    /// 执行单条命令
    ///
    /// 外层结果只表示超时，内层保留Redis原始错误以便调用方区分服务端拒绝
    async fn run<T: FromRedisValue + Send>(&self, cmd: &Cmd) -> Result<RedisResult<T>> {
        let timeout_ms = self.command_timeout_ms();
        let query = async {
            match self {
                RedisStore::Standalone { manager, .. } => {
                    let mut conn = manager.clone();
                    cmd.query_async::<T>(&mut conn).await
                }
                RedisStore::Cluster { connection, .. } => {
                    let mut conn = connection.clone();
                    cmd.query_async::<T>(&mut conn).await
                }
            }
        };
        timeout(Duration::from_millis(timeout_ms), query)
            .await
            .map_err(|_| {
                CacheError::Timeout(format!("Redis command timed out after {}ms", timeout_ms))
            })
    }
}

/// 将服务端对数值操作的拒绝转换为类型不匹配，其余错误保持为Redis错误
fn numeric_error(e: RedisError) -> CacheError {
    match e.kind() {
        ErrorKind::ResponseError | ErrorKind::ExtensionError => CacheError::TypeMismatch(
            format!("{} {}", e.code().unwrap_or("ERR"), e.detail().unwrap_or_default())
                .trim_end()
                .to_string(),
        ),
        _ => CacheError::Redis(e),
    }
}

#[async_trait]
impl HashStore for RedisStore {
    #[instrument(skip(self), level = "debug")]
    async fn get(&self, namespace: &str, key: &str) -> Result<Option<String>> {
        let mut cmd = redis::cmd("HGET");
        cmd.arg(namespace).arg(key);
        Ok(self.run(&cmd).await??)
    }

    #[instrument(skip(self, value), level = "debug")]
    async fn set(&self, namespace: &str, key: &str, value: &str) -> Result<()> {
        let mut cmd = redis::cmd("HSET");
        cmd.arg(namespace).arg(key).arg(value);
        let _: i64 = self.run(&cmd).await??;
        Ok(())
    }

    #[instrument(skip(self), level = "debug", fields(key_count = keys.len()))]
    async fn delete(&self, namespace: &str, keys: &[String]) -> Result<u64> {
        if keys.is_empty() {
            return Ok(0);
        }
        let mut cmd = redis::cmd("HDEL");
        cmd.arg(namespace).arg(keys);
        let removed: u64 = self.run(&cmd).await??;
        debug!("Redis HDEL: namespace={}, removed={}", namespace, removed);
        Ok(removed)
    }

    #[instrument(skip(self), level = "debug")]
    async fn exists(&self, namespace: &str, key: &str) -> Result<bool> {
        let mut cmd = redis::cmd("HEXISTS");
        cmd.arg(namespace).arg(key);
        Ok(self.run(&cmd).await??)
    }

    #[instrument(skip(self, value), level = "debug")]
    async fn set_nx(&self, namespace: &str, key: &str, value: &str) -> Result<bool> {
        let mut cmd = redis::cmd("HSETNX");
        cmd.arg(namespace).arg(key).arg(value);
        Ok(self.run(&cmd).await??)
    }

    #[instrument(skip(self), level = "debug")]
    async fn incr_by(&self, namespace: &str, key: &str, delta: i64) -> Result<i64> {
        let mut cmd = redis::cmd("HINCRBY");
        cmd.arg(namespace).arg(key).arg(delta);
        self.run(&cmd).await?.map_err(numeric_error)
    }

    #[instrument(skip(self), level = "debug")]
    async fn incr_by_float(&self, namespace: &str, key: &str, delta: f64) -> Result<f64> {
        let mut cmd = redis::cmd("HINCRBYFLOAT");
        cmd.arg(namespace).arg(key).arg(delta);
        self.run(&cmd).await?.map_err(numeric_error)
    }

    #[instrument(skip(self), level = "debug", fields(key_count = keys.len()))]
    async fn multi_get(&self, namespace: &str, keys: &[String]) -> Result<Vec<Option<String>>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        let mut cmd = redis::cmd("HMGET");
        cmd.arg(namespace).arg(keys);
        Ok(self.run(&cmd).await??)
    }

    #[instrument(skip(self), level = "debug")]
    async fn clear(&self, namespace: &str) -> Result<()> {
        let mut cmd = redis::cmd("DEL");
        cmd.arg(namespace);
        let _: i64 = self.run(&cmd).await??;
        Ok(())
    }

    #[instrument(skip(self), level = "debug")]
    async fn ping(&self) -> Result<()> {
        let response: String = self.run(&redis::cmd("PING")).await??;
        debug!("RedisStore ping: {}", response);
        Ok(())
    }
}
