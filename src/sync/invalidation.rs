//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了缓存失效机制，在文档删除后清理其所有缓存键。

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::backend::HashStore;
use crate::document::Document;
use crate::error::Result;
use crate::key::{derive_key, KeyDeriver};
use crate::metrics::GLOBAL_METRICS;

/// 某个标识的全部缓存键：每个字段键加上快照键
pub fn invalidation_keys<'a>(
    identity: &str,
    fields: impl IntoIterator<Item = &'a str>,
) -> Vec<String> {
    let mut keys: Vec<String> = fields
        .into_iter()
        .map(|field| derive_key(identity, field))
        .collect();
    keys.push(identity.to_string());
    keys
}

/// 缓存失效器
pub struct CacheInvalidator<D: Document> {
    store: Arc<dyn HashStore>,
    keys: KeyDeriver<D>,
}

impl<D: Document> Clone for CacheInvalidator<D> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            keys: self.keys.clone(),
        }
    }
}

impl<D: Document> CacheInvalidator<D> {
    pub fn new(store: Arc<dyn HashStore>, keys: KeyDeriver<D>) -> Self {
        Self { store, keys }
    }

    /// 删除文档的所有字段键和快照键
    ///
    /// 幂等，键不存在时不报错
    ///
    /// # 返回值
    ///
    /// 返回实际删除的键数量
    #[instrument(skip(self, document), level = "debug", fields(namespace = %self.keys.namespace()))]
    pub async fn clean(&self, document: &D) -> Result<u64> {
        let namespace = self.keys.namespace();
        let identity = self.keys.identity(document);
        let keys = invalidation_keys(&identity, D::live_fields().names());
        let removed = self.store.delete(namespace, &keys).await?;
        debug!("Invalidated {}: removed {} keys", identity, removed);
        GLOBAL_METRICS.record_request(namespace, "invalidate", "clean", "ok");
        Ok(removed)
    }
}
