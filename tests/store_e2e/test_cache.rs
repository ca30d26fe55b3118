//! E2E tests: cache string, expiry and hash commands.

use std::collections::HashMap;
use std::time::Duration;

use filestore_lib::cache::Ttl;

use super::test_helpers::*;

#[tokio::test]
#[ignore = "requires a running Redis"]
async fn test_set_get_without_expiry() {
    let cache = create_test_cache().await;
    let key = unique_id("access_key");

    cache.set(&key, "1").await.unwrap();
    assert_eq!(cache.get(&key).await.unwrap().as_deref(), Some("1"));
    assert_eq!(cache.ttl(&key).await.unwrap(), Ttl::Persistent);

    assert!(cache.del(&key).await.unwrap());
    assert!(cache.get(&key).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires a running Redis"]
async fn test_set_ex_ttl_is_bounded() {
    let cache = create_test_cache().await;
    let key = unique_id("access_key_expiry");

    cache.set_ex(&key, Duration::from_secs(60), "2").await.unwrap();

    match cache.ttl(&key).await.unwrap() {
        Ttl::Expires(left) => assert!(left > Duration::ZERO && left <= Duration::from_secs(60)),
        other => panic!("expected an expiring key, got {:?}", other),
    }

    cache.del(&key).await.unwrap();
}

#[tokio::test]
#[ignore = "requires a running Redis"]
async fn test_missing_key() {
    let cache = create_test_cache().await;
    let key = unique_id("I dont exist");

    assert!(cache.get(&key).await.unwrap().is_none());
    assert_eq!(cache.ttl(&key).await.unwrap(), Ttl::Missing);
    assert_eq!(cache.ttl(&key).await.unwrap().as_raw(), -2);
    assert!(!cache.expire(&key, Duration::from_secs(30)).await.unwrap());
}

#[tokio::test]
#[ignore = "requires a running Redis"]
async fn test_expire_and_get_ex() {
    let cache = create_test_cache().await;
    let key = unique_id("access_key");

    cache.set(&key, "1").await.unwrap();
    assert!(cache.expire(&key, Duration::from_secs(30)).await.unwrap());
    assert!(matches!(cache.ttl(&key).await.unwrap(), Ttl::Expires(d) if d <= Duration::from_secs(30)));

    let value = cache.get_ex(&key, Duration::from_secs(120)).await.unwrap();
    assert_eq!(value.as_deref(), Some("1"));
    match cache.ttl(&key).await.unwrap() {
        Ttl::Expires(left) => assert!(left > Duration::from_secs(30)),
        other => panic!("expected an expiring key, got {:?}", other),
    }

    cache.del(&key).await.unwrap();
    assert!(cache.get_ex(&key, Duration::from_secs(5)).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires a running Redis"]
async fn test_get_del_removes_key() {
    let cache = create_test_cache().await;
    let key = unique_id("access_key_expiry");

    cache.set_ex(&key, Duration::from_secs(60), "2").await.unwrap();
    assert_eq!(cache.get_del(&key).await.unwrap().as_deref(), Some("2"));
    assert!(cache.get(&key).await.unwrap().is_none());
    assert!(cache.get_del(&key).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires a running Redis"]
async fn test_hash_set_and_get_all() {
    let cache = create_test_cache().await;
    let key = unique_id("config");

    let mut fields = HashMap::new();
    fields.insert("model".to_string(), "llama4".to_string());

    cache.hset(&key, &fields).await.unwrap();
    assert_eq!(cache.hgetall(&key).await.unwrap(), fields);
    assert_eq!(cache.ttl(&key).await.unwrap(), Ttl::Persistent);

    cache.del(&key).await.unwrap();
    assert!(cache.hgetall(&key).await.unwrap().is_empty());
}
