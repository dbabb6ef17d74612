use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;
use crate::foundation::error::LottieError;

fn key(name: &str) -> CacheKey {
    CompositionSpec::asset(name).into()
}

fn comp(op: u32) -> Arc<Composition> {
    Arc::new(
        Composition::from_json_str(&format!(r#"{{"fr":30,"ip":0,"op":{op}}}"#)).unwrap(),
    )
}

#[test]
fn insert_get_and_remove() {
    let cache = CompositionCache::new(4);
    assert!(cache.is_empty());
    cache.insert(key("a"), comp(1));
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.get(&key("a")).unwrap().end_frame(), 1.0);
    assert!(cache.get(&key("b")).is_none());
    assert_eq!(cache.remove(&key("a")).unwrap().end_frame(), 1.0);
    assert!(cache.get(&key("a")).is_none());
}

#[test]
fn least_recently_used_is_evicted() {
    let cache = CompositionCache::new(2);
    cache.insert(key("a"), comp(1));
    cache.insert(key("b"), comp(2));
    // Touch `a` so `b` becomes the eviction candidate.
    assert!(cache.get(&key("a")).is_some());
    cache.insert(key("c"), comp(3));

    assert!(cache.get(&key("a")).is_some());
    assert!(cache.get(&key("b")).is_none());
    assert!(cache.get(&key("c")).is_some());
    assert_eq!(cache.len(), 2);
}

#[test]
fn zero_capacity_stores_nothing() {
    let cache = CompositionCache::new(0);
    cache.insert(key("a"), comp(1));
    assert!(cache.get(&key("a")).is_none());
    assert_eq!(cache.capacity(), 0);
}

#[test]
fn clear_empties_cache() {
    let cache = CompositionCache::default();
    assert_eq!(cache.capacity(), DEFAULT_CACHE_CAPACITY);
    cache.insert(key("a"), comp(1));
    cache.insert(key("b"), comp(2));
    cache.clear();
    assert!(cache.is_empty());
}

#[tokio::test]
async fn loads_once_per_key() {
    let cache = CompositionCache::new(4);
    let counter = AtomicUsize::new(0);
    let calls = &counter;

    for _ in 0..3 {
        let c = cache
            .get_or_try_load(&key("k"), || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(comp(5))
            })
            .await
            .unwrap();
        assert_eq!(c.end_frame(), 5.0);
    }
    assert_eq!(counter.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn concurrent_loads_share_one_task() {
    let cache = CompositionCache::new(4);
    let counter = AtomicUsize::new(0);
    let calls = &counter;
    let load = || async move {
        calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        Ok(comp(7))
    };

    let k = key("k");
    let (a, b) = tokio::join!(
        cache.get_or_try_load(&k, load),
        cache.get_or_try_load(&k, load)
    );
    assert!(Arc::ptr_eq(&a.unwrap(), &b.unwrap()));
    assert_eq!(counter.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn failures_are_not_cached() {
    let cache = CompositionCache::new(4);
    let err = cache
        .get_or_try_load(&key("k"), || async { Err(LottieError::network("offline")) })
        .await;
    assert!(err.is_err());
    assert!(cache.is_empty());

    let ok = cache
        .get_or_try_load(&key("k"), || async { Ok(comp(9)) })
        .await
        .unwrap();
    assert_eq!(ok.end_frame(), 9.0);
    assert_eq!(cache.len(), 1);
}

#[tokio::test]
async fn disabled_cache_always_loads() {
    let cache = CompositionCache::new(0);
    let counter = AtomicUsize::new(0);
    let calls = &counter;
    for _ in 0..2 {
        cache
            .get_or_try_load(&key("k"), || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(comp(1))
            })
            .await
            .unwrap();
    }
    assert_eq!(counter.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn failed_loads_do_not_evict_completed_entries() {
    let cache = CompositionCache::new(2);
    cache.insert(key("good"), comp(1));
    for name in ["bad1", "bad2", "bad3"] {
        let err = cache
            .get_or_try_load(&key(name), || async { Err(LottieError::network("offline")) })
            .await;
        assert!(err.is_err());
    }
    assert_eq!(cache.get(&key("good")).unwrap().end_frame(), 1.0);
    assert_eq!(cache.len(), 1);

    cache
        .get_or_try_load(&key("next"), || async { Ok(comp(2)) })
        .await
        .unwrap();
    assert!(cache.get(&key("good")).is_some());
    assert!(cache.get(&key("next")).is_some());
}

#[tokio::test]
async fn completed_load_evicts_least_recently_used() {
    let cache = CompositionCache::new(1);
    cache.insert(key("a"), comp(1));
    cache
        .get_or_try_load(&key("b"), || async { Ok(comp(2)) })
        .await
        .unwrap();
    assert!(cache.get(&key("a")).is_none());
    assert_eq!(cache.get(&key("b")).unwrap().end_frame(), 2.0);
}

#[tokio::test]
async fn inline_documents_are_keyed_by_full_text() {
    let cache = CompositionCache::new(4);
    let one = CacheKey::from(CompositionSpec::json(r#"{"fr":30,"ip":0,"op":1}"#));
    let two = CacheKey::from(CompositionSpec::json(r#"{"fr":30,"ip":0,"op":2}"#));
    let a = cache
        .get_or_try_load(&one, || async { Ok(comp(1)) })
        .await
        .unwrap();
    let b = cache
        .get_or_try_load(&two, || async { Ok(comp(2)) })
        .await
        .unwrap();
    assert_eq!(a.end_frame(), 1.0);
    assert_eq!(b.end_frame(), 2.0);
    assert_eq!(cache.len(), 2);
}

#[test]
fn theme_only_qualifies_resource_keys() {
    let day = CacheKey::new(CompositionSpec::resource(7), Theme::Day);
    let night = CacheKey::new(CompositionSpec::resource(7), Theme::Night);
    assert_ne!(day, night);
    assert_eq!(night.theme(), Some(Theme::Night));
    assert_eq!(night.to_string(), "resource 7 (night)");

    let url_day = CacheKey::new(CompositionSpec::url("https://a/b.json"), Theme::Day);
    let url_night = CacheKey::new(CompositionSpec::url("https://a/b.json"), Theme::Night);
    assert_eq!(url_day, url_night);
    assert_eq!(url_night.theme(), None);
    assert_eq!(url_night.spec(), &CompositionSpec::url("https://a/b.json"));
}
