use std::sync::atomic::{AtomicUsize, Ordering};

use super::testing::FakeFetcher;
use super::*;

fn no_delay(max_retries: u8) -> FetchConfig {
    FetchConfig {
        max_retries,
        retry_base_delay_ms: 0,
        ..FetchConfig::default()
    }
}

#[test]
fn fetch_config_defaults() {
    let config = FetchConfig::default();
    assert_eq!(config.max_retries, 3);
    assert_eq!(config.retry_base_delay_ms, 500);
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert!(config.user_agent.starts_with("lottie-loader/"));
}

#[test]
fn retry_delay_doubles() {
    let config = FetchConfig::default();
    assert_eq!(config.retry_delay(1), Duration::from_millis(500));
    assert_eq!(config.retry_delay(2), Duration::from_millis(1000));
    assert_eq!(config.retry_delay(3), Duration::from_millis(2000));
}

#[test]
fn reqwest_fetcher_rejects_bad_headers() {
    let config = FetchConfig {
        headers: vec![("bad header".to_string(), "v".to_string())],
        ..FetchConfig::default()
    };
    assert!(matches!(
        ReqwestFetcher::new(config),
        Err(LottieError::Validation(_))
    ));
}

#[test]
fn reqwest_fetcher_keeps_config() {
    let config = FetchConfig {
        headers: vec![("x-api-key".to_string(), "secret".to_string())],
        max_retries: 1,
        ..FetchConfig::default()
    };
    let fetcher = ReqwestFetcher::new(config).unwrap();
    assert_eq!(fetcher.config().max_retries, 1);
    assert_eq!(fetcher.config().headers.len(), 1);
}

#[tokio::test]
async fn retry_recovers_from_transient_errors() {
    let counter = AtomicUsize::new(0);
    let calls = &counter;
    let out = retry_transient(&no_delay(3), || async move {
        let n = calls.fetch_add(1, Ordering::SeqCst);
        if n < 2 {
            Err(LottieError::HttpStatus {
                status: 503,
                url: "u".to_string(),
            })
        } else {
            Ok(n)
        }
    })
    .await
    .unwrap();
    assert_eq!(out, 2);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn retry_gives_up_after_max_retries() {
    let counter = AtomicUsize::new(0);
    let calls = &counter;
    let out: LottieResult<()> = retry_transient(&no_delay(2), || async move {
        calls.fetch_add(1, Ordering::SeqCst);
        Err(LottieError::network("connection reset"))
    })
    .await;
    assert!(matches!(out, Err(LottieError::Network(_))));
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn client_errors_are_not_retried() {
    let counter = AtomicUsize::new(0);
    let calls = &counter;
    let out: LottieResult<()> = retry_transient(&no_delay(3), || async move {
        calls.fetch_add(1, Ordering::SeqCst);
        Err(LottieError::HttpStatus {
            status: 404,
            url: "u".to_string(),
        })
    })
    .await;
    assert!(matches!(
        out,
        Err(LottieError::HttpStatus { status: 404, .. })
    ));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn fake_fetcher_serves_canned_bodies() {
    let fetcher = FakeFetcher::default().with_body("https://example.com/anim.json", "{}");
    let url = Url::parse("https://example.com/anim.json").unwrap();
    let body = fetcher.fetch(&url).await.unwrap();
    assert_eq!(body.bytes, b"{}");
    assert_eq!(body.content_type.as_deref(), Some("application/json"));

    let missing = Url::parse("https://example.com/missing.json").unwrap();
    assert!(matches!(
        fetcher.fetch(&missing).await,
        Err(LottieError::HttpStatus { status: 404, .. })
    ));
    assert_eq!(fetcher.call_count(), 2);
}
