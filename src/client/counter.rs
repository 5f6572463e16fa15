//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块实现了实时字段的原子递增。
//!
//! 首次递增前会用持久化基线播种计数器，播种使用 `set_nx`，
//! 并发播种时只有一个写入生效，之后的递增都在该基线上原子执行。

use std::fmt;
use std::sync::Arc;

use tracing::{debug, instrument};

use super::repository::Repository;
use crate::backend::HashStore;
use crate::document::Document;
use crate::error::{CacheError, Result};
use crate::field::{FieldKind, FieldValue};
use crate::key::KeyDeriver;
use crate::metrics::GLOBAL_METRICS;

const NOT_AN_INTEGER: &str = "ERR value is not an integer or out of range";
const NOT_A_FLOAT: &str = "ERR value is not a valid float";
const NOT_A_NUMBER: &str = "ERR hash value is not a number";

/// 递增量
#[derive(Debug, Clone, PartialEq)]
pub enum IncrAmount {
    Integer(i64),
    Float(f64),
    /// 文本形式的递增量，按字段类型解析
    Text(String),
}

impl Default for IncrAmount {
    fn default() -> Self {
        IncrAmount::Integer(1)
    }
}

impl From<i64> for IncrAmount {
    fn from(value: i64) -> Self {
        IncrAmount::Integer(value)
    }
}

impl From<i32> for IncrAmount {
    fn from(value: i32) -> Self {
        IncrAmount::Integer(value as i64)
    }
}

impl From<u32> for IncrAmount {
    fn from(value: u32) -> Self {
        IncrAmount::Integer(value as i64)
    }
}

impl From<f64> for IncrAmount {
    fn from(value: f64) -> Self {
        IncrAmount::Float(value)
    }
}

impl From<f32> for IncrAmount {
    fn from(value: f32) -> Self {
        IncrAmount::Float(value as f64)
    }
}

impl From<&str> for IncrAmount {
    fn from(value: &str) -> Self {
        IncrAmount::Text(value.to_string())
    }
}

impl From<String> for IncrAmount {
    fn from(value: String) -> Self {
        IncrAmount::Text(value)
    }
}

/// 递增成功后的计数值
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Counter {
    Integer(i64),
    Float(f64),
}

/// 递增的对外结果
///
/// 成功时为新的数值，业务错误时为描述性消息
#[derive(Debug, Clone, PartialEq)]
pub enum IncrReply {
    Integer(i64),
    Float(f64),
    Message(String),
}

impl IncrReply {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            IncrReply::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            IncrReply::Integer(n) => Some(*n as f64),
            IncrReply::Float(f) => Some(*f),
            IncrReply::Message(_) => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            IncrReply::Message(m) => Some(m),
            _ => None,
        }
    }

    pub fn is_message(&self) -> bool {
        matches!(self, IncrReply::Message(_))
    }
}

impl From<Counter> for IncrReply {
    fn from(counter: Counter) -> Self {
        match counter {
            Counter::Integer(n) => IncrReply::Integer(n),
            Counter::Float(f) => IncrReply::Float(f),
        }
    }
}

impl fmt::Display for IncrReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IncrReply::Integer(n) => write!(f, "{}", n),
            IncrReply::Float(v) => write!(f, "{}", v),
            IncrReply::Message(m) => f.write_str(m),
        }
    }
}

/// 已按字段类型校验过的递增量
#[derive(Debug, Clone, Copy)]
enum Delta {
    Integer(i64),
    Float(f64),
}

/// 计数器播种基线的来源
enum Baseline {
    /// 从持久化仓库加载
    Persisted,
    /// 使用实例内存中的属性值
    InMemory(Option<FieldValue>),
}

/// 校验递增量与字段类型是否兼容
fn resolve_delta(kind: FieldKind, amount: &IncrAmount) -> Result<Delta> {
    let mismatch = |msg: &str| CacheError::TypeMismatch(msg.to_string());
    match kind {
        FieldKind::Other => Err(mismatch(NOT_A_NUMBER)),
        FieldKind::Integer => match amount {
            IncrAmount::Integer(n) => Ok(Delta::Integer(*n)),
            IncrAmount::Float(_) => Err(mismatch(NOT_AN_INTEGER)),
            IncrAmount::Text(s) => s
                .parse::<i64>()
                .map(Delta::Integer)
                .map_err(|_| mismatch(NOT_AN_INTEGER)),
        },
        FieldKind::Float => match amount {
            IncrAmount::Integer(n) => Ok(Delta::Float(*n as f64)),
            IncrAmount::Float(f) if f.is_finite() => Ok(Delta::Float(*f)),
            IncrAmount::Float(_) => Err(mismatch(NOT_A_FLOAT)),
            IncrAmount::Text(s) => match s.parse::<f64>() {
                Ok(f) if f.is_finite() => Ok(Delta::Float(f)),
                _ => Err(mismatch(NOT_A_FLOAT)),
            },
        },
    }
}

/// 将内部结果转换为对外结果
fn into_reply(result: Result<Counter>) -> Result<IncrReply> {
    match result {
        Ok(counter) => Ok(counter.into()),
        Err(e) if e.is_reportable() => Ok(IncrReply::Message(e.to_string())),
        Err(e) => Err(e),
    }
}

/// 计数器递增引擎
///
/// 类级别入口与实例级别入口最终都进入同一个内部实现
pub struct IncrementEngine<D: Document, R: Repository<D>> {
    store: Arc<dyn HashStore>,
    repository: Arc<R>,
    keys: KeyDeriver<D>,
}

impl<D: Document, R: Repository<D>> Clone for IncrementEngine<D, R> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            repository: self.repository.clone(),
            keys: self.keys.clone(),
        }
    }
}

impl<D: Document, R: Repository<D>> IncrementEngine<D, R> {
    pub fn new(store: Arc<dyn HashStore>, repository: Arc<R>, keys: KeyDeriver<D>) -> Self {
        Self {
            store,
            repository,
            keys,
        }
    }

    /// 按标识递增
    ///
    /// 计数器不存在时从持久化仓库加载文档作为基线
    #[instrument(skip(self, amount), level = "debug", fields(namespace = %self.keys.namespace()))]
    pub async fn incr_by_identity(
        &self,
        identity: &str,
        field: &str,
        amount: impl Into<IncrAmount>,
    ) -> Result<IncrReply> {
        let amount = amount.into();
        into_reply(
            self.try_incr(identity, field, &amount, Baseline::Persisted)
                .await,
        )
    }

    /// 按实例递增
    ///
    /// 计数器不存在时以实例内存中的属性值作为基线
    #[instrument(skip(self, document, amount), level = "debug", fields(namespace = %self.keys.namespace()))]
    pub async fn incr(
        &self,
        document: &D,
        field: &str,
        amount: impl Into<IncrAmount>,
    ) -> Result<IncrReply> {
        let amount = amount.into();
        let identity = self.keys.identity(document);
        let baseline = Baseline::InMemory(document.read_attribute(field));
        into_reply(self.try_incr(&identity, field, &amount, baseline).await)
    }

    async fn try_incr(
        &self,
        identity: &str,
        field: &str,
        amount: &IncrAmount,
        baseline: Baseline,
    ) -> Result<Counter> {
        let namespace = self.keys.namespace();
        let descriptor = D::live_fields()
            .get(field)
            .ok_or_else(|| CacheError::InvalidField(field.to_string()))?;

        let delta = match resolve_delta(descriptor.kind(), amount) {
            Ok(delta) => delta,
            Err(e) => {
                GLOBAL_METRICS.record_request(namespace, "counter", "incr", "rejected");
                return Err(e);
            }
        };

        let key = self.keys.derive_key(identity, field);
        if !self.store.exists(namespace, &key).await? {
            let value = match baseline {
                Baseline::Persisted => self
                    .repository
                    .find_by_identity(identity)
                    .await?
                    .ok_or_else(|| CacheError::NotFound(identity.to_string()))?
                    .read_attribute(field),
                Baseline::InMemory(value) => value,
            };
            if let Some(value) = value {
                let seeded = self.store.set_nx(namespace, &key, &value.to_raw()).await?;
                debug!("Counter seed for {}: value={}, won={}", key, value, seeded);
                if seeded {
                    GLOBAL_METRICS.record_request(namespace, "counter", "incr", "seeded");
                }
            }
        }

        let counter = match delta {
            Delta::Integer(n) => Counter::Integer(self.store.incr_by(namespace, &key, n).await?),
            Delta::Float(f) => {
                Counter::Float(self.store.incr_by_float(namespace, &key, f).await?)
            }
        };
        GLOBAL_METRICS.record_request(namespace, "counter", "incr", "ok");
        Ok(counter)
    }
}
