//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了实时属性的字段注册表和值类型。
//!
//! 每个文档类型在定义时构建一次 [`LiveFields`]，之后不可修改。
//! 字段的声明类型在注册时确定，递增与读取都按该类型分派。

use std::fmt;

use crate::error::{CacheError, Result};

/// i64 可精确表示的浮点范围 `[-2^63, 2^63)`
const I64_MIN_F64: f64 = -9_223_372_036_854_775_808.0;
const I64_MAX_EXCLUSIVE_F64: f64 = 9_223_372_036_854_775_808.0;

/// 实时字段的声明类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// 整数字段，使用原子整数递增
    Integer,
    /// 浮点字段，使用原子浮点递增
    Float,
    /// 其他类型字段，只能读取不能递增
    Other,
}

impl FieldKind {
    /// 是否为数值类型
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldKind::Integer | FieldKind::Float)
    }

    /// 按声明类型解析存储中的原始字符串
    ///
    /// 空字符串表示属性未设置，返回 `None`。
    pub fn decode(&self, raw: &str) -> Result<Option<FieldValue>> {
        if raw.is_empty() {
            return Ok(None);
        }
        match self {
            FieldKind::Integer => {
                if let Ok(n) = raw.parse::<i64>() {
                    return Ok(Some(FieldValue::Integer(n)));
                }
                match raw.parse::<f64>() {
                    Ok(f)
                        if f.fract() == 0.0
                            && (I64_MIN_F64..I64_MAX_EXCLUSIVE_F64).contains(&f) =>
                    {
                        Ok(Some(FieldValue::Integer(f as i64)))
                    }
                    _ => Err(CacheError::TypeMismatch(format!(
                        "cannot read {:?} as an integer",
                        raw
                    ))),
                }
            }
            FieldKind::Float => match raw.parse::<f64>() {
                Ok(f) if f.is_finite() => Ok(Some(FieldValue::Float(f))),
                _ => Err(CacheError::TypeMismatch(format!(
                    "cannot read {:?} as a float",
                    raw
                ))),
            },
            FieldKind::Other => Ok(Some(FieldValue::Text(raw.to_string()))),
        }
    }
}

/// 属性值
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl FieldValue {
    /// 转换为写入存储的原始字符串
    pub fn to_raw(&self) -> String {
        self.to_string()
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(n) => Some(*n as f64),
            FieldValue::Float(f) => Some(*f),
            FieldValue::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Integer(n) => write!(f, "{}", n),
            FieldValue::Float(v) => write!(f, "{}", v),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Integer(value as i64)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

/// 实时字段描述符
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveField {
    name: String,
    kind: FieldKind,
}

impl LiveField {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }
}

/// 实时字段注册表
///
/// 通过 [`LiveFields::builder`] 构建，构建完成后只读。字段按注册顺序保存，
/// 批量读取时的键顺序与此一致。
///
/// # 示例
///
/// ```
/// use liveattr::field::{FieldKind, LiveFields};
///
/// let fields = LiveFields::builder()
///     .integer("views")
///     .float("rating")
///     .other("title")
///     .build();
///
/// assert_eq!(fields.len(), 3);
/// assert_eq!(fields.get("views").map(|f| f.kind()), Some(FieldKind::Integer));
/// assert!(!fields.contains("url"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct LiveFields {
    fields: Vec<LiveField>,
}

impl LiveFields {
    pub fn builder() -> LiveFieldsBuilder {
        LiveFieldsBuilder::default()
    }

    /// 按名称查找字段
    pub fn get(&self, name: &str) -> Option<&LiveField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LiveField> {
        self.fields.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// 字段注册表构建器
#[derive(Debug, Default)]
pub struct LiveFieldsBuilder {
    fields: Vec<LiveField>,
}

impl LiveFieldsBuilder {
    /// 注册字段，同名字段只保留第一次注册
    pub fn field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        let name = name.into();
        if !self.fields.iter().any(|f| f.name == name) {
            self.fields.push(LiveField { name, kind });
        }
        self
    }

    pub fn integer(self, name: impl Into<String>) -> Self {
        self.field(name, FieldKind::Integer)
    }

    pub fn float(self, name: impl Into<String>) -> Self {
        self.field(name, FieldKind::Float)
    }

    pub fn other(self, name: impl Into<String>) -> Self {
        self.field(name, FieldKind::Other)
    }

    pub fn build(self) -> LiveFields {
        LiveFields {
            fields: self.fields,
        }
    }
}
