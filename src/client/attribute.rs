//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块实现了单个实时字段的读穿透访问。

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::backend::HashStore;
use crate::document::Document;
use crate::error::{CacheError, Result};
use crate::field::FieldValue;
use crate::key::KeyDeriver;
use crate::metrics::GLOBAL_METRICS;

/// 实时字段读取器
///
/// 命中时按声明类型解析缓存值；未命中时用内存中的属性值（必要时先生成默认值）
/// 回填缓存。回填后的键不设置过期时间。
pub struct AttributeCache<D: Document> {
    store: Arc<dyn HashStore>,
    keys: KeyDeriver<D>,
}

impl<D: Document> Clone for AttributeCache<D> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            keys: self.keys.clone(),
        }
    }
}

impl<D: Document> AttributeCache<D> {
    pub fn new(store: Arc<dyn HashStore>, keys: KeyDeriver<D>) -> Self {
        Self { store, keys }
    }

    /// 读取实时字段
    ///
    /// # 参数
    ///
    /// * `document` - 文档实例，未命中且属性未设置时会写入默认值
    /// * `field` - 字段名称
    ///
    /// # 返回值
    ///
    /// 返回按声明类型解析后的值，属性未设置时返回None
    #[instrument(skip(self, document), level = "debug", fields(namespace = %self.keys.namespace()))]
    pub async fn get(&self, document: &mut D, field: &str) -> Result<Option<FieldValue>> {
        let descriptor = D::live_fields()
            .get(field)
            .ok_or_else(|| CacheError::InvalidField(field.to_string()))?;
        let namespace = self.keys.namespace();
        let key = self.keys.key(document, field);

        if let Some(raw) = self.store.get(namespace, &key).await? {
            debug!("Attribute cache hit: {}", key);
            GLOBAL_METRICS.record_request(namespace, "attribute", "get", "hit");
            return descriptor.kind().decode(&raw);
        }

        let current = match document.read_attribute(field) {
            Some(value) => Some(value),
            None => {
                let generated = document.default_value(field);
                if generated.is_some() {
                    document.write_attribute(field, generated.clone());
                }
                generated
            }
        };
        let raw = current.map(|v| v.to_raw()).unwrap_or_default();
        self.store.set(namespace, &key, &raw).await?;
        debug!("Attribute cache miss, filled: {}", key);
        GLOBAL_METRICS.record_request(namespace, "attribute", "get", "miss");

        descriptor.kind().decode(&raw)
    }
}
