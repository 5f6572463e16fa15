//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了对象快照的序列化机制。

pub mod json;

use crate::config::SerializationType;
use crate::error::Result;
use serde::{de::DeserializeOwned, Serialize};

pub use json::JsonSerializer;

/// 序列化器特征
///
/// 快照以字符串形式存放在哈希字段中
pub trait Serializer: Send + Sync {
    /// 序列化值为字符串
    fn serialize<T: Serialize>(&self, value: &T) -> Result<String>;

    /// 从字符串反序列化值
    fn deserialize<T: DeserializeOwned>(&self, data: &str) -> Result<T>;
}

/// 序列化器枚举
///
/// 用于在运行时按配置选择序列化器
#[derive(Clone, Debug)]
pub enum SerializerEnum {
    Json(JsonSerializer),
}

impl Default for SerializerEnum {
    fn default() -> Self {
        SerializerEnum::Json(JsonSerializer::new())
    }
}

impl From<&SerializationType> for SerializerEnum {
    fn from(kind: &SerializationType) -> Self {
        match kind {
            SerializationType::Json => SerializerEnum::Json(JsonSerializer::new()),
        }
    }
}

impl Serializer for SerializerEnum {
    fn serialize<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            SerializerEnum::Json(s) => s.serialize(value),
        }
    }

    fn deserialize<T: DeserializeOwned>(&self, data: &str) -> Result<T> {
        match self {
            SerializerEnum::Json(s) => s.deserialize(data),
        }
    }
}
