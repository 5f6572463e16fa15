//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 自定义标识字段测试
//!
//! 文档以 `url` 而非主键生成缓存键，字段键、快照键与清理都应使用该标识。

use async_trait::async_trait;
use lazy_static::lazy_static;
use liveattr::error::Result;
use liveattr::field::{FieldValue, LiveFields};
use liveattr::{Document, HashStore, IncrReply, LiveClient, MemoryStore, Repository};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

const NAMESPACE: &str = "Link";
const URL: &str = "example.com/a";

lazy_static! {
    static ref LINK_FIELDS: LiveFields = LiveFields::builder()
        .integer("views")
        .float("score")
        .other("title")
        .build();
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Link {
    id: String,
    url: String,
    title: Option<String>,
    views: Option<i64>,
    score: Option<f64>,
}

impl Link {
    fn new(id: &str, url: &str) -> Self {
        Self {
            id: id.to_string(),
            url: url.to_string(),
            title: None,
            views: None,
            score: None,
        }
    }
}

impl Document for Link {
    fn type_name() -> &'static str {
        "Link"
    }

    fn live_fields() -> &'static LiveFields {
        &LINK_FIELDS
    }

    fn identity_field() -> &'static str {
        "url"
    }

    fn id(&self) -> String {
        self.id.clone()
    }

    fn read_attribute(&self, field: &str) -> Option<FieldValue> {
        match field {
            "url" => Some(FieldValue::from(self.url.as_str())),
            "title" => self.title.clone().map(FieldValue::Text),
            "views" => self.views.map(FieldValue::Integer),
            "score" => self.score.map(FieldValue::Float),
            _ => None,
        }
    }

    fn write_attribute(&mut self, field: &str, value: Option<FieldValue>) {
        match field {
            "title" => self.title = value.map(|v| v.to_string()),
            "views" => self.views = value.and_then(|v| v.as_i64()),
            "score" => self.score = value.and_then(|v| v.as_f64()),
            _ => {}
        }
    }
}

/// 以url为键的仓库
#[derive(Default)]
struct LinkRepository {
    links: Mutex<HashMap<String, Link>>,
}

impl LinkRepository {
    fn insert(&self, link: Link) {
        if let Ok(mut links) = self.links.lock() {
            links.insert(link.url.clone(), link);
        }
    }

    fn find(&self, url: &str) -> Option<Link> {
        self.links.lock().ok()?.get(url).cloned()
    }
}

#[async_trait]
impl Repository<Link> for LinkRepository {
    async fn find_by_identity(&self, identity: &str) -> Result<Option<Link>> {
        Ok(self.find(identity))
    }

    async fn save(&self, document: &Link) -> Result<()> {
        self.insert(document.clone());
        Ok(())
    }

    async fn delete(&self, document: &Link) -> Result<()> {
        if let Ok(mut links) = self.links.lock() {
            links.remove(&document.url);
        }
        Ok(())
    }
}

fn setup() -> (MemoryStore, Arc<LinkRepository>, LiveClient<Link, LinkRepository>) {
    liveattr::utils::setup_logging();
    let store = MemoryStore::new();
    let repository = Arc::new(LinkRepository::default());
    let client = LiveClient::new(Arc::new(store.clone()), repository.clone());
    (store, repository, client)
}

fn assert_no_primary_key_entries(store: &MemoryStore) {
    for key in store.keys(NAMESPACE) {
        assert!(key.starts_with(URL), "unexpected key {}", key);
    }
}

#[tokio::test]
async fn test_keys_use_identity_field() {
    let (_store, _repo, client) = setup();
    let link = Link::new("7", URL);

    assert_eq!(client.key(&link, "views"), format!("{}_views", URL));
}

#[tokio::test]
async fn test_lifecycle_keyed_by_identity_field() {
    let (store, repo, client) = setup();
    let mut link = Link::new("7", URL);
    link.views = Some(10);
    link.title = Some("home".to_string());
    repo.insert(link.clone());

    assert_eq!(
        client.get(&mut link, "title").await.unwrap(),
        Some(FieldValue::Text("home".to_string()))
    );
    assert_eq!(client.incr(&link, "views").await.unwrap(), IncrReply::Integer(11));
    assert_eq!(
        client.incr_by_identity(URL, "views", 4).await.unwrap(),
        IncrReply::Integer(15)
    );
    assert_eq!(
        client.incr_by_identity(URL, "score", 0.5).await.unwrap(),
        IncrReply::Float(0.5)
    );

    assert_eq!(
        store.get(NAMESPACE, &format!("{}_views", URL)).await.unwrap().as_deref(),
        Some("15")
    );
    assert!(!store.exists(NAMESPACE, "7_views").await.unwrap());

    client.update_db(&mut link).await.unwrap();
    assert_eq!(link.views, Some(15));
    assert_eq!(link.score, Some(0.5));
    assert!(store.exists(NAMESPACE, URL).await.unwrap());
    assert!(!store.exists(NAMESPACE, "7").await.unwrap());

    let fetched = client.fetch(URL).await.unwrap();
    assert_eq!(fetched, link);
    assert_no_primary_key_entries(&store);

    client.destroy(&link).await.unwrap();
    assert!(store.is_empty(NAMESPACE));
    assert_eq!(repo.find(URL), None);
}

#[tokio::test]
async fn test_save_and_fetch_by_identity_field() {
    let (store, repo, client) = setup();
    let mut link = Link::new("7", URL);
    link.views = Some(3);

    client.save(&link).await.unwrap();
    assert_eq!(repo.find(URL), Some(link.clone()));
    assert_eq!(store.keys(NAMESPACE), vec![URL.to_string()]);

    store.clear(NAMESPACE).await.unwrap();
    assert_eq!(client.fetch(URL).await.unwrap(), link);
    assert!(client.fetch("7").await.is_err());
    assert_no_primary_key_entries(&store);
}
