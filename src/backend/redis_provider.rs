//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了Redis连接提供者接口和默认实现。

use crate::{
    config::StoreConfig,
    error::{CacheError, Result},
    utils::redaction::redact_connection_string,
};
use async_trait::async_trait;
use redis::{aio::ConnectionManager, cluster_async::ClusterConnection, Client};
use secrecy::ExposeSecret;
use tokio::time::{timeout, Duration};
use tracing::info;

/// Redis连接提供者
///
/// 连接的建立与存储操作分离，测试中可替换为不依赖真实Redis的实现
#[async_trait]
pub trait RedisProvider: Send + Sync {
    async fn connect_standalone(&self, config: &StoreConfig) -> Result<ConnectionManager>;
    async fn connect_sentinel(&self, config: &StoreConfig) -> Result<ConnectionManager>;
    async fn connect_cluster(&self, config: &StoreConfig) -> Result<ClusterConnection>;
}

pub struct DefaultRedisProvider;

impl DefaultRedisProvider {
    fn connection_string(config: &StoreConfig) -> String {
        let raw = config.connection_string.expose_secret();
        if config.enable_tls && !raw.starts_with("rediss://") {
            raw.replace("redis://", "rediss://")
        } else {
            raw.to_string()
        }
    }
}

#[async_trait]
impl RedisProvider for DefaultRedisProvider {
    async fn connect_standalone(&self, config: &StoreConfig) -> Result<ConnectionManager> {
        let connection_string = Self::connection_string(config);
        let client = Client::open(connection_string.as_str())?;
        let manager = timeout(
            Duration::from_millis(config.connection_timeout_ms),
            client.get_connection_manager(),
        )
        .await
        .map_err(|_| {
            CacheError::Timeout(format!(
                "Connection timed out after {}ms. Target: {}",
                config.connection_timeout_ms,
                redact_connection_string(&connection_string)
            ))
        })??;
        info!(
            "Connected to Redis at {}",
            redact_connection_string(&connection_string)
        );
        Ok(manager)
    }

    async fn connect_sentinel(&self, config: &StoreConfig) -> Result<ConnectionManager> {
        let sentinel = config.sentinel.as_ref().ok_or_else(|| {
            CacheError::ConfigError("Sentinel configuration is missing".to_string())
        })?;

        // redis+sentinel://[:password@]host:port[,host:port]/master_name
        let mut url = "redis+sentinel://".to_string();
        if let Some(password) = &config.password {
            url.push_str(&format!(":{}@", password.expose_secret()));
        }

        let nodes: Vec<&str> = sentinel
            .nodes
            .iter()
            .map(|n| {
                n.trim_start_matches("redis://")
                    .trim_start_matches("redis+sentinel://")
            })
            .collect();
        if nodes.is_empty() {
            return Err(CacheError::ConfigError(
                "No sentinel nodes provided".to_string(),
            ));
        }
        url.push_str(&nodes.join(","));
        url.push('/');
        url.push_str(&sentinel.master_name);

        let client = Client::open(url)?;
        let manager = timeout(
            Duration::from_millis(config.connection_timeout_ms),
            client.get_connection_manager(),
        )
        .await
        .map_err(|_| {
            CacheError::Timeout(format!(
                "Sentinel connection timed out after {}ms",
                config.connection_timeout_ms
            ))
        })??;
        info!("Connected to Redis master {} via sentinel", sentinel.master_name);
        Ok(manager)
    }

    async fn connect_cluster(&self, config: &StoreConfig) -> Result<ClusterConnection> {
        let cluster = config.cluster.as_ref().ok_or_else(|| {
            CacheError::ConfigError("Cluster configuration is missing".to_string())
        })?;

        let mut builder = redis::cluster::ClusterClient::builder(cluster.nodes.clone());
        if let Some(password) = &config.password {
            builder = builder.password(password.expose_secret().to_string());
        }
        let client = builder.build()?;

        let connection = timeout(
            Duration::from_millis(config.connection_timeout_ms),
            client.get_async_connection(),
        )
        .await
        .map_err(|_| {
            CacheError::Timeout(format!(
                "Cluster connection timed out after {}ms",
                config.connection_timeout_ms
            ))
        })??;
        info!("Connected to Redis cluster ({} seed nodes)", cluster.nodes.len());
        Ok(connection)
    }
}
