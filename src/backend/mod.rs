//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了存储后端接口及其实现，包括Redis后端和内存后端。
//!
//! 每个命名空间对应一个哈希表，字段缓存与对象快照都以哈希字段的形式存放。

pub mod memory;
pub mod redis_provider;
pub mod redis_store;

use crate::error::Result;
use async_trait::async_trait;

pub use memory::MemoryStore;
pub use redis_store::RedisStore;

/// 哈希存储接口
///
/// 所有键都必须带命名空间限定。实现方需保证 `set_nx`、`incr_by`、
/// `incr_by_float` 的原子性，上层不做任何加锁。
#[async_trait]
pub trait HashStore: Send + Sync {
    /// 读取单个键
    async fn get(&self, namespace: &str, key: &str) -> Result<Option<String>>;

    /// 写入单个键
    async fn set(&self, namespace: &str, key: &str, value: &str) -> Result<()>;

    /// 删除一个或多个键，返回实际删除的数量；键不存在时不报错
    async fn delete(&self, namespace: &str, keys: &[String]) -> Result<u64>;

    async fn exists(&self, namespace: &str, key: &str) -> Result<bool>;

    /// 仅当键不存在时写入，返回是否写入成功
    async fn set_nx(&self, namespace: &str, key: &str, value: &str) -> Result<bool>;

    /// 原子整数递增，已有值不是整数时返回 `TypeMismatch`
    async fn incr_by(&self, namespace: &str, key: &str, delta: i64) -> Result<i64>;

    /// 原子浮点递增，已有值不是数值时返回 `TypeMismatch`
    async fn incr_by_float(&self, namespace: &str, key: &str, delta: f64) -> Result<f64>;

    /// 批量读取，结果顺序与 `keys` 一致
    async fn multi_get(&self, namespace: &str, keys: &[String]) -> Result<Vec<Option<String>>>;

    /// 删除整个命名空间
    async fn clear(&self, namespace: &str) -> Result<()>;

    /// 检查连接是否正常
    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
