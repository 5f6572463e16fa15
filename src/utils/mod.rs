//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 统一工具模块
//!
//! 提供命令行、测试和基准共用的工具函数，包括：
//! - 日志设置工具
//! - Redis连接检查工具
//! - 命名空间生成工具

pub mod redaction;

use std::sync::Once;
use std::time::Duration;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// 安装全局日志订阅者
///
/// 遵循 `RUST_LOG`，未设置时默认为 `info`。多次调用只生效一次。
pub fn setup_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        tracing_subscriber::fmt()
            .with_span_events(FmtSpan::CLOSE)
            .with_env_filter(filter)
            .try_init()
            .ok();
    });
}

/// 检查指定URL的Redis是否可用
pub async fn is_redis_available_url(url: &str) -> bool {
    if std::env::var("LIVEATTR_SKIP_REDIS_TESTS").is_ok() {
        return false;
    }

    let client = match redis::Client::open(url) {
        Ok(c) => c,
        Err(_) => return false,
    };

    matches!(
        tokio::time::timeout(
            Duration::from_secs(1),
            client.get_multiplexed_async_connection(),
        )
        .await,
        Ok(Ok(_))
    )
}

/// 生成唯一的命名空间前缀，避免测试之间互相干扰
pub fn generate_unique_namespace(base: &str) -> String {
    format!("{}_{}:", base, uuid::Uuid::new_v4().simple())
}
