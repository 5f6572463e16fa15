//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了单个文档类型的缓存客户端。

pub mod attribute;
pub mod counter;
pub mod object;
pub mod repository;

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::backend::HashStore;
use crate::config::GlobalConfig;
use crate::document::Document;
use crate::error::Result;
use crate::field::{FieldValue, LiveFields};
use crate::key::KeyDeriver;
use crate::serialization::SerializerEnum;
use crate::sync::{CacheInvalidator, ReconciliationEngine};

pub use attribute::AttributeCache;
pub use counter::{Counter, IncrAmount, IncrReply, IncrementEngine};
pub use object::ObjectCache;
pub use repository::Repository;

/// 实时属性客户端
///
/// 为一个文档类型组合键生成、字段读取、递增、写回、快照和失效组件。
/// 存储句柄在所有类型之间共享，按命名空间隔离。
///
/// 宿主在持久化写入成功后必须调用 [`on_after_persist`](Self::on_after_persist)，
/// 删除成功后必须调用 [`on_after_delete`](Self::on_after_delete)；
/// 或者通过 [`save`](Self::save) 与 [`destroy`](Self::destroy) 完成持久化，由客户端负责调用。
pub struct LiveClient<D: Document, R: Repository<D>> {
    keys: KeyDeriver<D>,
    repository: Arc<R>,
    attributes: AttributeCache<D>,
    counters: IncrementEngine<D, R>,
    reconciler: ReconciliationEngine<D, R>,
    objects: ObjectCache<D, R>,
    invalidator: CacheInvalidator<D>,
}

impl<D: Document, R: Repository<D>> Clone for LiveClient<D, R> {
    fn clone(&self) -> Self {
        Self {
            keys: self.keys.clone(),
            repository: self.repository.clone(),
            attributes: self.attributes.clone(),
            counters: self.counters.clone(),
            reconciler: self.reconciler.clone(),
            objects: self.objects.clone(),
            invalidator: self.invalidator.clone(),
        }
    }
}

impl<D: Document, R: Repository<D>> std::fmt::Debug for LiveClient<D, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveClient")
            .field("namespace", &self.keys.namespace())
            .field("live_fields", &D::live_fields().len())
            .finish()
    }
}

impl<D: Document, R: Repository<D>> LiveClient<D, R> {
    /// 使用默认配置创建客户端
    pub fn new(store: Arc<dyn HashStore>, repository: Arc<R>) -> Self {
        Self::with_config(store, repository, &GlobalConfig::default())
    }

    /// 使用全局配置创建客户端
    ///
    /// # 参数
    ///
    /// * `store` - 共享的存储句柄
    /// * `repository` - 持久化仓库
    /// * `config` - 命名空间前缀与快照序列化方式
    pub fn with_config(store: Arc<dyn HashStore>, repository: Arc<R>, config: &GlobalConfig) -> Self {
        let keys = KeyDeriver::<D>::new(&config.namespace_prefix);
        let serializer = SerializerEnum::from(&config.serialization);
        debug!("LiveClient created for namespace {}", keys.namespace());
        Self {
            attributes: AttributeCache::new(store.clone(), keys.clone()),
            counters: IncrementEngine::new(store.clone(), repository.clone(), keys.clone()),
            reconciler: ReconciliationEngine::new(store.clone(), repository.clone(), keys.clone()),
            objects: ObjectCache::new(store.clone(), repository.clone(), keys.clone(), serializer),
            invalidator: CacheInvalidator::new(store, keys.clone()),
            repository,
            keys,
        }
    }

    pub fn namespace(&self) -> &str {
        self.keys.namespace()
    }

    pub fn live_fields(&self) -> &'static LiveFields {
        D::live_fields()
    }

    /// 文档某个字段的缓存键
    pub fn key(&self, document: &D, field: &str) -> String {
        self.keys.key(document, field)
    }

    /// 读取实时字段，未命中时回填缓存
    pub async fn get(&self, document: &mut D, field: &str) -> Result<Option<FieldValue>> {
        self.attributes.get(document, field).await
    }

    /// 实例字段加一
    pub async fn incr(&self, document: &D, field: &str) -> Result<IncrReply> {
        self.counters.incr(document, field, IncrAmount::default()).await
    }

    /// 实例字段按指定量递增
    pub async fn incr_by(
        &self,
        document: &D,
        field: &str,
        amount: impl Into<IncrAmount>,
    ) -> Result<IncrReply> {
        self.counters.incr(document, field, amount).await
    }

    /// 按标识递增，首次递增时从仓库加载基线
    pub async fn incr_by_identity(
        &self,
        identity: &str,
        field: &str,
        amount: impl Into<IncrAmount>,
    ) -> Result<IncrReply> {
        self.counters.incr_by_identity(identity, field, amount).await
    }

    /// 将缓存中的实时字段写回文档并保存，成功后刷新快照
    ///
    /// 保存失败时返回仓库的错误（通常为 [`CacheError::Persistence`]），缓存不变。
    /// 存储错误（`Redis`、`Timeout` 或 `Serialization`）既可能来自保存前读取缓存，
    /// 也可能来自保存后刷新快照；后一种情况下文档已经写入仓库，重试会再保存一次。
    ///
    /// [`CacheError::Persistence`]: crate::error::CacheError::Persistence
    #[instrument(skip(self, document), level = "debug", fields(namespace = %self.keys.namespace()))]
    pub async fn update_db(&self, document: &mut D) -> Result<Vec<String>> {
        let changed = self.reconciler.reconcile(document).await?;
        self.on_after_persist(document).await?;
        Ok(changed)
    }

    /// 按标识读取对象快照
    pub async fn fetch(&self, identity: &str) -> Result<D> {
        self.objects.fetch(identity).await
    }

    /// 手动刷新对象快照
    pub async fn update_to_redis(&self, document: &D) -> Result<()> {
        self.objects.update_to_redis(document).await
    }

    /// 删除文档的所有缓存键
    pub async fn clean(&self, document: &D) -> Result<u64> {
        self.invalidator.clean(document).await
    }

    /// 持久化写入成功后的扩展点
    pub async fn on_after_persist(&self, document: &D) -> Result<()> {
        self.objects.update_to_redis(document).await
    }

    /// 删除成功后的扩展点
    pub async fn on_after_delete(&self, document: &D) -> Result<()> {
        self.invalidator.clean(document).await.map(|_| ())
    }

    /// 保存文档并刷新快照
    #[instrument(skip(self, document), level = "debug", fields(namespace = %self.keys.namespace()))]
    pub async fn save(&self, document: &D) -> Result<()> {
        self.repository.save(document).await?;
        self.on_after_persist(document).await
    }

    /// 删除文档并清理缓存
    #[instrument(skip(self, document), level = "debug", fields(namespace = %self.keys.namespace()))]
    pub async fn destroy(&self, document: &D) -> Result<()> {
        self.repository.delete(document).await?;
        self.on_after_delete(document).await
    }
}
