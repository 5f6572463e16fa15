//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块负责命名空间与缓存键的生成。

use std::marker::PhantomData;

use crate::document::Document;

/// 拼接字段缓存键：`{identity}_{field}`
pub fn derive_key(identity: &str, field: &str) -> String {
    format!("{}_{}", identity, field)
}

/// 读取文档的标识值
///
/// 标识字段为 `id` 时直接使用主键，否则读取对应属性；属性未设置时为空字符串。
pub fn resolve_identity<D: Document>(document: &D) -> String {
    match D::identity_field() {
        "id" => document.id(),
        field => document
            .read_attribute(field)
            .map(|v| v.to_raw())
            .unwrap_or_default(),
    }
}

/// 单个文档类型的键生成器
///
/// 命名空间由可选前缀加类型名组成，字段键与快照键都位于同一命名空间内。
pub struct KeyDeriver<D> {
    namespace: String,
    _marker: PhantomData<fn() -> D>,
}

impl<D> Clone for KeyDeriver<D> {
    fn clone(&self) -> Self {
        Self {
            namespace: self.namespace.clone(),
            _marker: PhantomData,
        }
    }
}

impl<D> std::fmt::Debug for KeyDeriver<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyDeriver")
            .field("namespace", &self.namespace)
            .finish()
    }
}

impl<D: Document> KeyDeriver<D> {
    pub fn new(namespace_prefix: &str) -> Self {
        Self {
            namespace: format!("{}{}", namespace_prefix, D::type_name()),
            _marker: PhantomData,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn derive_key(&self, identity: &str, field: &str) -> String {
        derive_key(identity, field)
    }

    pub fn identity(&self, document: &D) -> String {
        resolve_identity(document)
    }

    /// 文档的字段缓存键
    pub fn key(&self, document: &D, field: &str) -> String {
        derive_key(&resolve_identity(document), field)
    }

    /// 某个标识下所有实时字段的键，顺序与注册顺序一致
    pub fn live_keys(&self, identity: &str) -> Vec<String> {
        D::live_fields()
            .names()
            .map(|field| derive_key(identity, field))
            .collect()
    }
}
