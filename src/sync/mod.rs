//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了缓存与持久化存储之间的同步机制，包括批量写回和失效清理。

pub mod invalidation;
pub mod reconcile;

pub use invalidation::CacheInvalidator;
pub use reconcile::ReconciliationEngine;
