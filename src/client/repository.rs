//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 持久化回源接口
//!
//! 定义缓存未命中或写回时访问权威存储的接口

use crate::document::Document;
use crate::error::Result;
use async_trait::async_trait;

/// 持久化仓库特征
///
/// 由宿主实现，连接权威文档存储。实现方返回的错误应使用
/// [`CacheError::Persistence`](crate::error::CacheError::Persistence)。
#[async_trait]
pub trait Repository<D: Document>: Send + Sync {
    /// 根据标识加载文档
    ///
    /// # 参数
    ///
    /// * `identity` - 标识字段的值
    ///
    /// # 返回值
    ///
    /// 返回加载的文档，如果不存在则返回None
    async fn find_by_identity(&self, identity: &str) -> Result<Option<D>>;

    /// 保存整个文档
    async fn save(&self, document: &D) -> Result<()>;

    /// 删除文档
    async fn delete(&self, document: &D) -> Result<()>;
}
