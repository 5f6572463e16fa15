//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块实现了整个对象快照的缓存。
//!
//! 快照与字段缓存位于同一命名空间，以原始标识作为键。

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use super::repository::Repository;
use crate::backend::HashStore;
use crate::document::Document;
use crate::error::{CacheError, Result};
use crate::key::KeyDeriver;
use crate::metrics::GLOBAL_METRICS;
use crate::serialization::{Serializer, SerializerEnum};

/// 对象快照缓存
pub struct ObjectCache<D: Document, R: Repository<D>> {
    store: Arc<dyn HashStore>,
    repository: Arc<R>,
    keys: KeyDeriver<D>,
    serializer: SerializerEnum,
}

impl<D: Document, R: Repository<D>> Clone for ObjectCache<D, R> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            repository: self.repository.clone(),
            keys: self.keys.clone(),
            serializer: self.serializer.clone(),
        }
    }
}

impl<D: Document, R: Repository<D>> ObjectCache<D, R> {
    pub fn new(
        store: Arc<dyn HashStore>,
        repository: Arc<R>,
        keys: KeyDeriver<D>,
        serializer: SerializerEnum,
    ) -> Self {
        Self {
            store,
            repository,
            keys,
            serializer,
        }
    }

    /// 按标识读取对象
    ///
    /// 快照无法反序列化时从仓库重新加载并刷新快照，不向调用方报告。
    /// 仓库中不存在该标识时返回 `NotFound`。
    #[instrument(skip(self), level = "debug", fields(namespace = %self.keys.namespace()))]
    pub async fn fetch(&self, identity: &str) -> Result<D> {
        let namespace = self.keys.namespace();
        match self.store.get(namespace, identity).await? {
            Some(raw) => match self.serializer.deserialize::<D>(&raw) {
                Ok(document) => {
                    debug!("Snapshot hit: {}", identity);
                    GLOBAL_METRICS.record_request(namespace, "object", "fetch", "hit");
                    Ok(document)
                }
                Err(e) => {
                    let drift = CacheError::SchemaDrift(e.to_string());
                    warn!("{}; reloading {} from repository", drift, identity);
                    GLOBAL_METRICS.record_request(namespace, "object", "fetch", "drift");
                    self.fetch_from_db(identity).await
                }
            },
            None => {
                debug!("Snapshot miss: {}", identity);
                GLOBAL_METRICS.record_request(namespace, "object", "fetch", "miss");
                self.fetch_from_db(identity).await
            }
        }
    }

    /// 从仓库加载对象并写入快照
    #[instrument(skip(self), level = "debug")]
    pub async fn fetch_from_db(&self, identity: &str) -> Result<D> {
        let document = self
            .repository
            .find_by_identity(identity)
            .await?
            .ok_or_else(|| CacheError::NotFound(identity.to_string()))?;
        self.update_to_redis(&document).await?;
        Ok(document)
    }

    /// 序列化对象并写入快照
    #[instrument(skip(self, document), level = "debug", fields(namespace = %self.keys.namespace()))]
    pub async fn update_to_redis(&self, document: &D) -> Result<()> {
        let identity = self.keys.identity(document);
        let raw = self.serializer.serialize(document)?;
        self.store
            .set(self.keys.namespace(), &identity, &raw)
            .await?;
        debug!("Snapshot written: {}", identity);
        Ok(())
    }
}
