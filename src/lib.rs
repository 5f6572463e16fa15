//! liveattr - Redis实时属性缓存库
//!
//! 将文档的部分属性（实时字段）镜像到Redis哈希中，计数类字段在缓存中原子递增，
//! 直到显式写回时才一次性保存到持久化存储；同时提供整个对象的快照缓存和删除后的缓存清理。

#![doc(html_root_url = "https://docs.rs/liveattr/0.1.0")]

pub use serde;
pub use serde::{Deserialize, Serialize};
pub use serde_json;
pub use tokio;

pub mod backend;
pub mod cli;
pub mod client;
pub mod config;
pub mod document;
pub mod error;
pub mod field;
pub mod key;
pub mod manager;
pub mod metrics;
pub mod serialization;
pub mod sync;
pub mod utils;

// Re-export commonly used items
pub use backend::{HashStore, MemoryStore, RedisStore};
pub use client::{IncrAmount, IncrReply, LiveClient, Repository};
pub use config::Config;
pub use document::Document;
pub use error::{CacheError, Result};
pub use field::{FieldKind, FieldValue, LiveFields};
pub use manager::CacheManager;

/// liveattr 版本号
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
