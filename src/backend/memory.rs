//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了进程内的哈希存储实现。
//!
//! 语义与Redis哈希命令保持一致（包括错误消息），用于嵌入式场景、命令行工具和测试。

use super::HashStore;
use crate::error::{CacheError, Result};
use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, instrument};

const NOT_AN_INTEGER: &str = "ERR hash value is not an integer";
const NOT_A_FLOAT: &str = "ERR hash value is not a float";
const OVERFLOW: &str = "ERR increment or decrement would overflow";
const NOT_FINITE: &str = "ERR increment would produce NaN or Infinity";

/// 内存哈希存储
///
/// 以命名空间为粒度加锁，单个命名空间内的读改写是原子的。克隆后共享同一份数据。
#[derive(Clone, Default)]
pub struct MemoryStore {
    hashes: Arc<DashMap<String, HashMap<String, String>>>,
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("namespaces", &self.hashes.len())
            .finish()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 命名空间内的键数量
    pub fn len(&self, namespace: &str) -> usize {
        self.hashes.get(namespace).map(|h| h.len()).unwrap_or(0)
    }

    pub fn is_empty(&self, namespace: &str) -> bool {
        self.len(namespace) == 0
    }

    /// 命名空间内的全部键，按字典序排列
    pub fn keys(&self, namespace: &str) -> Vec<String> {
        let mut keys: Vec<String> = self
            .hashes
            .get(namespace)
            .map(|h| h.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }
}

#[async_trait]
impl HashStore for MemoryStore {
    #[instrument(skip(self), level = "debug")]
    async fn get(&self, namespace: &str, key: &str) -> Result<Option<String>> {
        Ok(self
            .hashes
            .get(namespace)
            .and_then(|hash| hash.get(key).cloned()))
    }

    #[instrument(skip(self, value), level = "debug")]
    async fn set(&self, namespace: &str, key: &str, value: &str) -> Result<()> {
        self.hashes
            .entry(namespace.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    #[instrument(skip(self), level = "debug", fields(key_count = keys.len()))]
    async fn delete(&self, namespace: &str, keys: &[String]) -> Result<u64> {
        let removed = match self.hashes.get_mut(namespace) {
            Some(mut hash) => keys.iter().filter(|k| hash.remove(*k).is_some()).count() as u64,
            None => 0,
        };
        // Redis 在哈希清空后会删除整个键
        self.hashes.remove_if(namespace, |_, hash| hash.is_empty());
        debug!("Memory delete: namespace={}, removed={}", namespace, removed);
        Ok(removed)
    }

    #[instrument(skip(self), level = "debug")]
    async fn exists(&self, namespace: &str, key: &str) -> Result<bool> {
        Ok(self
            .hashes
            .get(namespace)
            .map(|hash| hash.contains_key(key))
            .unwrap_or(false))
    }

    #[instrument(skip(self, value), level = "debug")]
    async fn set_nx(&self, namespace: &str, key: &str, value: &str) -> Result<bool> {
        let mut hash = self.hashes.entry(namespace.to_string()).or_default();
        if hash.contains_key(key) {
            return Ok(false);
        }
        hash.insert(key.to_string(), value.to_string());
        Ok(true)
    }

    #[instrument(skip(self), level = "debug")]
    async fn incr_by(&self, namespace: &str, key: &str, delta: i64) -> Result<i64> {
        let mut hash = self.hashes.entry(namespace.to_string()).or_default();
        let current = match hash.get(key) {
            Some(raw) => raw
                .parse::<i64>()
                .map_err(|_| CacheError::TypeMismatch(NOT_AN_INTEGER.to_string()))?,
            None => 0,
        };
        let next = current
            .checked_add(delta)
            .ok_or_else(|| CacheError::TypeMismatch(OVERFLOW.to_string()))?;
        hash.insert(key.to_string(), next.to_string());
        Ok(next)
    }

    #[instrument(skip(self), level = "debug")]
    async fn incr_by_float(&self, namespace: &str, key: &str, delta: f64) -> Result<f64> {
        let mut hash = self.hashes.entry(namespace.to_string()).or_default();
        let current = match hash.get(key) {
            Some(raw) => match raw.parse::<f64>() {
                Ok(v) if v.is_finite() => v,
                _ => return Err(CacheError::TypeMismatch(NOT_A_FLOAT.to_string())),
            },
            None => 0.0,
        };
        let next = current + delta;
        if !next.is_finite() {
            return Err(CacheError::TypeMismatch(NOT_FINITE.to_string()));
        }
        hash.insert(key.to_string(), next.to_string());
        Ok(next)
    }

    #[instrument(skip(self), level = "debug", fields(key_count = keys.len()))]
    async fn multi_get(&self, namespace: &str, keys: &[String]) -> Result<Vec<Option<String>>> {
        let values = match self.hashes.get(namespace) {
            Some(hash) => keys.iter().map(|k| hash.get(k).cloned()).collect(),
            None => vec![None; keys.len()],
        };
        Ok(values)
    }

    #[instrument(skip(self), level = "debug")]
    async fn clear(&self, namespace: &str) -> Result<()> {
        self.hashes.remove(namespace);
        Ok(())
    }
}
