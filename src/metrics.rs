//! Copyright (c) 2025, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了缓存系统的指标收集功能。

use dashmap::DashMap;
use lazy_static::lazy_static;
use std::fmt::Write;
use std::sync::Arc;
use tracing::{span, Level};

/// 指标收集器
///
/// 用于收集实时属性缓存的运行时指标
#[derive(Clone, Debug, Default)]
pub struct Metrics {
    /// 请求总数统计
    /// key: "namespace:component:op:result"
    pub requests_total: Arc<DashMap<String, u64>>,
}

lazy_static! {
    /// 全局指标实例
    pub static ref GLOBAL_METRICS: Metrics = Metrics::default();
}

impl Metrics {
    /// 记录请求指标
    ///
    /// # 参数
    ///
    /// * `namespace` - 命名空间
    /// * `component` - 组件（attribute/counter/object/reconcile/invalidate）
    /// * `op` - 操作类型
    /// * `result` - 操作结果（hit/miss/seeded/ok/rejected等）
    pub fn record_request(&self, namespace: &str, component: &str, op: &str, result: &str) {
        let span = span!(Level::TRACE, "cache_request", namespace, component, op, result);
        let _enter = span.enter();
        let key = format!("{}:{}:{}:{}", namespace, component, op, result);
        *self.requests_total.entry(key).or_insert(0) += 1;
    }

    /// 读取某个计数
    pub fn count(&self, namespace: &str, component: &str, op: &str, result: &str) -> u64 {
        let key = format!("{}:{}:{}:{}", namespace, component, op, result);
        self.requests_total.get(&key).map(|v| *v).unwrap_or(0)
    }
}

/// 获取指标字符串
///
/// 以Prometheus文本格式输出所有计数
pub fn get_metrics_string() -> String {
    render(&GLOBAL_METRICS)
}

fn render(metrics: &Metrics) -> String {
    let mut lines: Vec<(String, u64)> = metrics
        .requests_total
        .iter()
        .map(|entry| (entry.key().clone(), *entry.value()))
        .collect();
    lines.sort();

    let mut output = String::new();
    for (key, value) in lines {
        // 命名空间可能包含冒号前缀，从右侧拆分
        let mut parts = key.rsplitn(4, ':');
        let (result, op, component, namespace) =
            match (parts.next(), parts.next(), parts.next(), parts.next()) {
                (Some(r), Some(o), Some(c), Some(n)) => (r, o, c, n),
                _ => continue,
            };
        let _ = writeln!(
            output,
            "liveattr_requests_total{{namespace=\"{}\", component=\"{}\", op=\"{}\", result=\"{}\"}} {}",
            namespace, component, op, result, value
        );
    }
    output
}
