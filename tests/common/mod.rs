//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了测试的通用模型、仓库替身和设置函数。

use async_trait::async_trait;
use lazy_static::lazy_static;
use liveattr::error::{CacheError, Result};
use liveattr::field::{FieldValue, LiveFields};
use liveattr::{Document, LiveClient, MemoryStore, Repository};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[allow(dead_code)]
pub const NAMESPACE: &str = "Article";

lazy_static! {
    static ref ARTICLE_FIELDS: LiveFields = LiveFields::builder()
        .integer("views")
        .integer("likes")
        .float("rating")
        .other("title")
        .build();
}

/// 测试文档
///
/// `url` 不是实时字段；`likes` 未设置时默认为 0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Article {
    pub id: String,
    pub title: Option<String>,
    pub views: Option<i64>,
    pub likes: Option<i64>,
    pub rating: Option<f64>,
    pub url: Option<String>,
}

#[allow(dead_code)]
impl Article {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            title: None,
            views: None,
            likes: None,
            rating: None,
            url: None,
        }
    }

    pub fn with_views(mut self, views: i64) -> Self {
        self.views = Some(views);
        self
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }
}

impl Document for Article {
    fn type_name() -> &'static str {
        "Article"
    }

    fn live_fields() -> &'static LiveFields {
        &ARTICLE_FIELDS
    }

    fn id(&self) -> String {
        self.id.clone()
    }

    fn read_attribute(&self, field: &str) -> Option<FieldValue> {
        match field {
            "id" => Some(FieldValue::from(self.id.as_str())),
            "title" => self.title.clone().map(FieldValue::Text),
            "views" => self.views.map(FieldValue::Integer),
            "likes" => self.likes.map(FieldValue::Integer),
            "rating" => self.rating.map(FieldValue::Float),
            "url" => self.url.clone().map(FieldValue::Text),
            _ => None,
        }
    }

    fn write_attribute(&mut self, field: &str, value: Option<FieldValue>) {
        match field {
            "title" => self.title = value.map(|v| v.to_string()),
            "views" => self.views = value.and_then(|v| v.as_i64()),
            "likes" => self.likes = value.and_then(|v| v.as_i64()),
            "rating" => self.rating = value.and_then(|v| v.as_f64()),
            "url" => self.url = value.map(|v| v.to_string()),
            _ => {}
        }
    }

    fn default_value(&self, field: &str) -> Option<FieldValue> {
        match field {
            "likes" => Some(FieldValue::Integer(0)),
            _ => None,
        }
    }
}

/// 内存仓库替身
#[derive(Default)]
pub struct MockRepository {
    documents: Mutex<HashMap<String, Article>>,
    saves: AtomicUsize,
    fail_saves: AtomicBool,
}

#[allow(dead_code)]
impl MockRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, article: Article) {
        if let Ok(mut docs) = self.documents.lock() {
            docs.insert(article.id.clone(), article);
        }
    }

    pub fn find(&self, id: &str) -> Option<Article> {
        self.documents.lock().ok()?.get(id).cloned()
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl Repository<Article> for MockRepository {
    async fn find_by_identity(&self, identity: &str) -> Result<Option<Article>> {
        Ok(self.find(identity))
    }

    async fn save(&self, document: &Article) -> Result<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(CacheError::Persistence("database unavailable".to_string()));
        }
        self.saves.fetch_add(1, Ordering::SeqCst);
        self.insert(document.clone());
        Ok(())
    }

    async fn delete(&self, document: &Article) -> Result<()> {
        if let Ok(mut docs) = self.documents.lock() {
            docs.remove(&document.id);
        }
        Ok(())
    }
}

pub fn setup_logging() {
    liveattr::utils::setup_logging();
}

/// 构建基于内存存储的客户端
#[allow(dead_code)]
pub fn setup() -> (
    MemoryStore,
    Arc<MockRepository>,
    LiveClient<Article, MockRepository>,
) {
    setup_logging();
    let store = MemoryStore::new();
    let repository = Arc::new(MockRepository::new());
    let client = LiveClient::new(Arc::new(store.clone()), repository.clone());
    (store, repository, client)
}
