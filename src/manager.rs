//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了缓存管理器，负责按配置建立共享的存储句柄并创建类型客户端。

use crate::backend::redis_provider::{DefaultRedisProvider, RedisProvider};
use crate::backend::{HashStore, MemoryStore, RedisStore};
use crate::client::{LiveClient, Repository};
use crate::config::{Config, StoreMode};
use crate::document::Document;
use crate::error::{CacheError, Result};
use std::sync::Arc;
use tracing::{info, instrument};

/// 缓存管理器
///
/// 持有所有文档类型共享的存储句柄。不存在全局实例，由宿主显式构建并传递。
#[derive(Clone)]
pub struct CacheManager {
    store: Arc<dyn HashStore>,
    config: Config,
}

impl std::fmt::Debug for CacheManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheManager")
            .field("mode", &self.config.store.mode)
            .field("namespace_prefix", &self.config.global.namespace_prefix)
            .finish()
    }
}

impl CacheManager {
    /// 初始化缓存管理器
    ///
    /// # 参数
    ///
    /// * `config` - 缓存系统配置
    ///
    /// # 返回值
    ///
    /// 返回管理器实例，配置无效或连接失败时返回相应的错误
    #[instrument(skip(config), level = "info", fields(mode = ?config.store.mode))]
    pub async fn init(config: Config) -> Result<Self> {
        Self::init_with_provider(config, Arc::new(DefaultRedisProvider)).await
    }

    /// 使用指定的连接提供者初始化
    #[instrument(skip(config, provider), level = "info")]
    pub async fn init_with_provider(
        config: Config,
        provider: Arc<dyn RedisProvider>,
    ) -> Result<Self> {
        config.validate().map_err(CacheError::ConfigError)?;

        let store: Arc<dyn HashStore> = match config.store.mode {
            StoreMode::Memory => Arc::new(MemoryStore::new()),
            _ => Arc::new(RedisStore::new_with_provider(&config.store, provider).await?),
        };
        info!(
            "CacheManager initialized (mode={:?}, prefix={:?})",
            config.store.mode, config.global.namespace_prefix
        );
        Ok(Self { store, config })
    }

    /// 使用已有的存储句柄构建管理器
    pub fn with_store(store: Arc<dyn HashStore>, config: Config) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> Arc<dyn HashStore> {
        self.store.clone()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// 为文档类型创建客户端，共享管理器的存储句柄
    pub fn client<D, R>(&self, repository: Arc<R>) -> LiveClient<D, R>
    where
        D: Document,
        R: Repository<D>,
    {
        LiveClient::with_config(self.store.clone(), repository, &self.config.global)
    }
}
