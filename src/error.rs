//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了缓存系统的错误类型和处理机制。

use thiserror::Error;

/// 缓存系统错误类型枚举
///
/// 前四个变体对应实时属性的业务错误，其余为基础设施故障。
/// 递增路径上的业务错误会被转换为字符串结果，基础设施故障则直接向上传播。
#[derive(Error, Debug)]
pub enum CacheError {
    /// 字段未注册为实时属性
    #[error("{0} is not a live attributes")]
    InvalidField(String),

    /// 递增量与字段声明类型不兼容，消息原样输出
    #[error("{0}")]
    TypeMismatch(String),

    /// 缓存快照无法按当前类型反序列化
    #[error("Schema drift: {0}")]
    SchemaDrift(String),

    /// 持久化存储中不存在该标识
    #[error("Document not found for identity {0}")]
    NotFound(String),

    /// 序列化错误
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// 持久化协作方返回的错误
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// 配置错误
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Redis错误
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// 超时错误
    #[error("Timeout error: {0}")]
    Timeout(String),

    /// IO错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CacheError {
    /// 是否属于可以转换为描述性消息的业务错误
    ///
    /// 递增操作会把这类错误渲染为字符串返回，而不是作为故障抛出
    pub fn is_reportable(&self) -> bool {
        matches!(
            self,
            CacheError::InvalidField(_) | CacheError::TypeMismatch(_) | CacheError::NotFound(_)
        )
    }
}

/// 缓存操作结果类型别名
///
/// 简化错误处理，所有缓存操作都返回此类型
pub type Result<T> = std::result::Result<T, CacheError>;
