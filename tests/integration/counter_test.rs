//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 计数器递增测试

#[path = "../common/mod.rs"]
mod common;

use common::{setup, Article, NAMESPACE};
use liveattr::{HashStore, IncrAmount, IncrReply};

#[tokio::test]
async fn test_first_incr_seeds_from_persisted_baseline() {
    let (store, repo, client) = setup();
    repo.insert(Article::new("1").with_views(50));

    let reply = client.incr_by_identity("1", "views", 1).await.unwrap();
    assert_eq!(reply, IncrReply::Integer(51));

    let reply = client.incr_by_identity("1", "views", 1).await.unwrap();
    assert_eq!(reply, IncrReply::Integer(52));
    assert_eq!(
        store.get(NAMESPACE, "1_views").await.unwrap().as_deref(),
        Some("52")
    );
}

#[tokio::test]
async fn test_instance_incr_uses_in_memory_baseline() {
    let (store, repo, client) = setup();
    let article = Article::new("1").with_views(10);

    let reply = client.incr(&article, "views").await.unwrap();

    assert_eq!(reply.as_i64(), Some(11));
    assert_eq!(
        store.get(NAMESPACE, "1_views").await.unwrap().as_deref(),
        Some("11")
    );
    assert_eq!(repo.save_count(), 0);
}

#[tokio::test]
async fn test_integer_incr_returns_previous_plus_amount() {
    let (store, _repo, client) = setup();
    let article = Article::new("1").with_views(5);

    let mut expected = 5;
    for amount in [3_i64, -2, 100, 0] {
        expected += amount;
        let reply = client.incr_by(&article, "views", amount).await.unwrap();
        assert_eq!(reply, IncrReply::Integer(expected));
        assert_eq!(
            store.get(NAMESPACE, "1_views").await.unwrap(),
            Some(expected.to_string())
        );
    }
}

#[tokio::test]
async fn test_unset_baseline_starts_from_zero() {
    let (_store, repo, client) = setup();
    repo.insert(Article::new("1"));

    let reply = client
        .incr_by_identity("1", "views", IncrAmount::default())
        .await
        .unwrap();

    assert_eq!(reply, IncrReply::Integer(1));
}

/// 读取未设置的字段会写入空值占位，之后的递增不再播种而是被存储拒绝
#[tokio::test]
async fn test_incr_after_reading_unset_field_is_rejected() {
    let (store, _repo, client) = setup();
    let mut read_first = Article::new("1");

    assert_eq!(client.get(&mut read_first, "views").await.unwrap(), None);
    assert_eq!(
        store.get(NAMESPACE, "1_views").await.unwrap().as_deref(),
        Some("")
    );

    let reply = client.incr(&read_first, "views").await.unwrap();
    assert_eq!(reply.message(), Some("ERR hash value is not an integer"));
    assert_eq!(
        store.get(NAMESPACE, "1_views").await.unwrap().as_deref(),
        Some("")
    );

    let untouched = Article::new("2");
    assert_eq!(
        client.incr(&untouched, "views").await.unwrap(),
        IncrReply::Integer(1)
    );
}

#[tokio::test]
async fn test_float_field_accepts_integer_and_float_amounts() {
    let (_store, _repo, client) = setup();
    let article = Article::new("1").with_rating(4.5);

    let reply = client.incr_by(&article, "rating", 0.5).await.unwrap();
    assert_eq!(reply, IncrReply::Float(5.0));

    let reply = client.incr_by(&article, "rating", 1).await.unwrap();
    assert_eq!(reply, IncrReply::Float(6.0));

    let reply = client.incr_by(&article, "rating", "0.25").await.unwrap();
    assert_eq!(reply.as_f64(), Some(6.25));
}

#[tokio::test]
async fn test_float_amount_on_integer_field_is_rejected() {
    let (store, _repo, client) = setup();
    let article = Article::new("1").with_views(10);

    let reply = client.incr_by(&article, "views", 10.0).await.unwrap();

    assert_eq!(
        reply.message(),
        Some("ERR value is not an integer or out of range")
    );
    assert!(!store.exists(NAMESPACE, "1_views").await.unwrap());
}

#[tokio::test]
async fn test_non_numeric_amount_on_float_field_is_rejected() {
    let (store, _repo, client) = setup();
    let article = Article::new("1").with_rating(1.0);

    let reply = client.incr_by(&article, "rating", "abc").await.unwrap();

    assert_eq!(reply.to_string(), "ERR value is not a valid float");
    assert!(store.is_empty(NAMESPACE));
}

#[tokio::test]
async fn test_other_field_is_not_a_number() {
    let (store, _repo, client) = setup();
    let article = Article::new("1").with_title("hello");

    for amount in [IncrAmount::Integer(1), IncrAmount::Float(1.5)] {
        let reply = client.incr_by(&article, "title", amount).await.unwrap();
        assert_eq!(reply.message(), Some("ERR hash value is not a number"));
    }
    assert!(store.is_empty(NAMESPACE));
}

#[tokio::test]
async fn test_unregistered_field_returns_message() {
    let (store, repo, client) = setup();
    repo.insert(Article::new("1"));

    let reply = client.incr_by_identity("1", "baz", 1).await.unwrap();
    assert_eq!(reply.message(), Some("baz is not a live attributes"));

    let reply = client.incr(&Article::new("1"), "url").await.unwrap();
    assert_eq!(reply.message(), Some("url is not a live attributes"));

    assert!(store.is_empty(NAMESPACE));
}

#[tokio::test]
async fn test_missing_document_returns_message() {
    let (store, _repo, client) = setup();

    let reply = client.incr_by_identity("404", "views", 1).await.unwrap();

    assert!(reply.is_message());
    assert_eq!(reply.to_string(), "Document not found for identity 404");
    assert!(store.is_empty(NAMESPACE));
}

#[tokio::test]
async fn test_existing_counter_is_not_reseeded() {
    let (store, _repo, client) = setup();
    store.set(NAMESPACE, "1_views", "100").await.unwrap();
    let article = Article::new("1").with_views(5);

    let reply = client.incr(&article, "views").await.unwrap();

    assert_eq!(reply, IncrReply::Integer(101));
}

#[tokio::test]
async fn test_non_integer_cached_value_returns_store_message() {
    let (store, _repo, client) = setup();
    store.set(NAMESPACE, "1_views", "abc").await.unwrap();
    let article = Article::new("1");

    let reply = client.incr(&article, "views").await.unwrap();

    assert_eq!(reply.message(), Some("ERR hash value is not an integer"));
    assert_eq!(
        store.get(NAMESPACE, "1_views").await.unwrap().as_deref(),
        Some("abc")
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_first_increments_seed_once() {
    let (store, repo, client) = setup();
    repo.insert(Article::new("1").with_views(50));

    let mut handles = Vec::new();
    for _ in 0..20 {
        let client = client.clone();
        handles.push(tokio::spawn(async move {
            client.incr_by_identity("1", "views", 1).await
        }));
    }

    let mut results = Vec::new();
    for handle in handles {
        let reply = handle.await.unwrap().unwrap();
        results.push(reply.as_i64().unwrap());
    }
    results.sort_unstable();

    assert_eq!(results, (51..=70).collect::<Vec<i64>>());
    assert_eq!(
        store.get(NAMESPACE, "1_views").await.unwrap().as_deref(),
        Some("70")
    );
}
