//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了宿主文档类型需要实现的接口。

use serde::{de::DeserializeOwned, Serialize};

use crate::field::{FieldValue, LiveFields};

/// 可缓存文档特征
///
/// 宿主类型通过实现此特征接入实时属性缓存。序列化形式即快照格式，
/// 如需检测模型变更导致的快照失效，可在类型上启用
/// `#[serde(deny_unknown_fields)]`。
///
/// # 示例
///
/// ```
/// use lazy_static::lazy_static;
/// use liveattr::document::Document;
/// use liveattr::field::{FieldValue, LiveFields};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct Article {
///     id: String,
///     views: Option<i64>,
/// }
///
/// lazy_static! {
///     static ref ARTICLE_FIELDS: LiveFields = LiveFields::builder().integer("views").build();
/// }
///
/// impl Document for Article {
///     fn type_name() -> &'static str {
///         "Article"
///     }
///
///     fn live_fields() -> &'static LiveFields {
///         &ARTICLE_FIELDS
///     }
///
///     fn id(&self) -> String {
///         self.id.clone()
///     }
///
///     fn read_attribute(&self, field: &str) -> Option<FieldValue> {
///         match field {
///             "id" => Some(FieldValue::from(self.id.as_str())),
///             "views" => self.views.map(FieldValue::Integer),
///             _ => None,
///         }
///     }
///
///     fn write_attribute(&mut self, field: &str, value: Option<FieldValue>) {
///         if field == "views" {
///             self.views = value.and_then(|v| v.as_i64());
///         }
///     }
/// }
/// ```
pub trait Document: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// 类型名称，作为存储中的命名空间
    fn type_name() -> &'static str;

    /// 实时字段注册表
    fn live_fields() -> &'static LiveFields;

    /// 用于生成缓存键的标识字段，默认为主键
    fn identity_field() -> &'static str {
        "id"
    }

    /// 主键
    fn id(&self) -> String;

    /// 读取内存中的属性值，未设置时返回 `None`
    fn read_attribute(&self, field: &str) -> Option<FieldValue>;

    /// 写入内存中的属性值
    fn write_attribute(&mut self, field: &str, value: Option<FieldValue>);

    /// 属性未设置时的默认值生成规则
    fn default_value(&self, _field: &str) -> Option<FieldValue> {
        None
    }
}
