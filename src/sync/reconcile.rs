//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块实现了实时字段到持久化存储的批量写回。

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::backend::HashStore;
use crate::client::repository::Repository;
use crate::document::Document;
use crate::error::Result;
use crate::key::KeyDeriver;
use crate::metrics::GLOBAL_METRICS;

/// 写回引擎
///
/// 一次批量读取所有实时字段，一次持久化写入，与字段数量无关
pub struct ReconciliationEngine<D: Document, R: Repository<D>> {
    store: Arc<dyn HashStore>,
    repository: Arc<R>,
    keys: KeyDeriver<D>,
}

impl<D: Document, R: Repository<D>> Clone for ReconciliationEngine<D, R> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            repository: self.repository.clone(),
            keys: self.keys.clone(),
        }
    }
}

impl<D: Document, R: Repository<D>> ReconciliationEngine<D, R> {
    pub fn new(store: Arc<dyn HashStore>, repository: Arc<R>, keys: KeyDeriver<D>) -> Self {
        Self {
            store,
            repository,
            keys,
        }
    }

    /// 将缓存值写回文档并保存
    ///
    /// 缓存中不存在的字段保持内存值不变。保存失败时不产生任何缓存副作用。
    ///
    /// # 返回值
    ///
    /// 返回内存值被缓存值覆盖的字段名称
    #[instrument(skip(self, document), level = "debug", fields(namespace = %self.keys.namespace()))]
    pub async fn reconcile(&self, document: &mut D) -> Result<Vec<String>> {
        let namespace = self.keys.namespace();
        let identity = self.keys.identity(document);
        let keys = self.keys.live_keys(&identity);
        let values = self.store.multi_get(namespace, &keys).await?;

        let mut changed = Vec::new();
        for (field, cached) in D::live_fields().iter().zip(values) {
            let Some(raw) = cached else {
                continue;
            };
            let current = document
                .read_attribute(field.name())
                .map(|v| v.to_raw())
                .unwrap_or_default();
            if raw != current {
                let value = field.kind().decode(&raw)?;
                document.write_attribute(field.name(), value);
                changed.push(field.name().to_string());
            }
        }
        debug!(
            "Reconciling {}: {} of {} fields changed",
            identity,
            changed.len(),
            keys.len()
        );

        self.repository.save(document).await?;
        GLOBAL_METRICS.record_request(namespace, "reconcile", "update_db", "ok");
        Ok(changed)
    }
}
