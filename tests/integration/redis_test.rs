//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! Redis集成测试
//!
//! 需要本地Redis（或 `REDIS_URL` 指定的实例），不可用时自动跳过

#[path = "../common/mod.rs"]
mod common;

use common::{setup_logging, Article, MockRepository};
use liveattr::config::{Config, StoreMode};
use liveattr::utils::{generate_unique_namespace, is_redis_available_url};
use liveattr::{CacheManager, HashStore, IncrReply, LiveClient};
use secrecy::SecretString;
use serial_test::serial;
use std::env;
use std::sync::Arc;

fn redis_url() -> String {
    env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string())
}

/// 连接Redis并创建带唯一前缀的客户端，Redis不可用时返回None
async fn redis_client() -> Option<(
    CacheManager,
    Arc<MockRepository>,
    LiveClient<Article, MockRepository>,
)> {
    setup_logging();
    let url = redis_url();
    if !is_redis_available_url(&url).await {
        println!("跳过测试: Redis不可用");
        return None;
    }

    let mut config = Config::default();
    config.store.mode = StoreMode::Standalone;
    config.store.connection_string = SecretString::new(url.into());
    config.global.namespace_prefix = generate_unique_namespace("liveattr_test");

    let manager = CacheManager::init(config).await.unwrap();
    let repository = Arc::new(MockRepository::new());
    let client = manager.client(repository.clone());
    Some((manager, repository, client))
}

#[tokio::test]
#[serial]
async fn test_redis_store_hash_operations() {
    let Some((manager, _repo, client)) = redis_client().await else {
        return;
    };
    let store = manager.store();
    let ns = client.namespace().to_string();

    store.ping().await.unwrap();
    store.set(&ns, "a", "1").await.unwrap();
    assert!(store.set_nx(&ns, "b", "2").await.unwrap());
    assert!(!store.set_nx(&ns, "b", "3").await.unwrap());
    assert!(store.exists(&ns, "a").await.unwrap());

    let keys = vec!["a".to_string(), "missing".to_string(), "b".to_string()];
    assert_eq!(
        store.multi_get(&ns, &keys).await.unwrap(),
        vec![Some("1".to_string()), None, Some("2".to_string())]
    );
    assert_eq!(store.delete(&ns, &keys).await.unwrap(), 2);
    assert_eq!(store.delete(&ns, &keys).await.unwrap(), 0);

    store.clear(&ns).await.unwrap();
}

#[tokio::test]
#[serial]
async fn test_redis_incr_seeds_and_counts() {
    let Some((manager, repo, client)) = redis_client().await else {
        return;
    };
    repo.insert(Article::new("1").with_views(50).with_rating(1.5));

    assert_eq!(
        client.incr_by_identity("1", "views", 1).await.unwrap(),
        IncrReply::Integer(51)
    );
    assert_eq!(
        client.incr_by_identity("1", "views", 9).await.unwrap(),
        IncrReply::Integer(60)
    );
    assert_eq!(
        client.incr_by_identity("1", "rating", 1).await.unwrap(),
        IncrReply::Float(2.5)
    );
    assert_eq!(
        client
            .incr_by_identity("1", "views", 1.5)
            .await
            .unwrap()
            .message(),
        Some("ERR value is not an integer or out of range")
    );

    manager.store().clear(client.namespace()).await.unwrap();
}

#[tokio::test]
#[serial]
async fn test_redis_rejects_increment_of_non_integer_value() {
    let Some((manager, _repo, client)) = redis_client().await else {
        return;
    };
    let store = manager.store();
    store.set(client.namespace(), "1_views", "abc").await.unwrap();

    let reply = client.incr(&Article::new("1"), "views").await.unwrap();

    let message = reply.message().unwrap_or_default().to_string();
    assert!(message.contains("not an integer"), "{}", message);

    store.clear(client.namespace()).await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[serial]
async fn test_redis_concurrent_seeding() {
    let Some((manager, repo, client)) = redis_client().await else {
        return;
    };
    repo.insert(Article::new("1").with_views(50));

    let mut handles = Vec::new();
    for _ in 0..20 {
        let client = client.clone();
        handles.push(tokio::spawn(async move {
            client.incr_by_identity("1", "views", 1).await
        }));
    }
    for handle in handles {
        assert!(handle.await.unwrap().is_ok());
    }

    assert_eq!(
        manager
            .store()
            .get(client.namespace(), "1_views")
            .await
            .unwrap()
            .as_deref(),
        Some("70")
    );

    manager.store().clear(client.namespace()).await.unwrap();
}

#[tokio::test]
#[serial]
async fn test_redis_lifecycle() {
    let Some((manager, repo, client)) = redis_client().await else {
        return;
    };
    let store = manager.store();
    let mut article = Article::new("1").with_views(3);
    repo.insert(article.clone());

    client.incr(&article, "views").await.unwrap();
    client.update_db(&mut article).await.unwrap();
    assert_eq!(article.views, Some(4));
    assert_eq!(client.fetch("1").await.unwrap(), article);

    client.destroy(&article).await.unwrap();
    assert!(!store.exists(client.namespace(), "1").await.unwrap());
    assert!(!store.exists(client.namespace(), "1_views").await.unwrap());

    store.clear(client.namespace()).await.unwrap();
}

#[tokio::test]
#[serial]
async fn test_skip_variable_disables_redis() {
    env::set_var("LIVEATTR_SKIP_REDIS_TESTS", "1");
    let available = is_redis_available_url(&redis_url()).await;
    env::remove_var("LIVEATTR_SKIP_REDIS_TESTS");

    assert!(!available);
}
