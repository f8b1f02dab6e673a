//! Integration tests for the pure core: ticker identity, caching, token
//! state, feature config, and the header registry. No network access is
//! required; pipeline behavior that needs a live endpoint is covered by the
//! unit tests next to the pipeline itself.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

use wstrade_rs::prelude::*;
use wstrade_rs::{HeaderRegistry, TokenStore, TokenUpdate};

static INIT: Once = Once::new();

fn init_logging() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init()
            .ok();
    });
}

fn offline_client() -> WsTradeClient {
    init_logging();
    let session = Session::from_tokens("https://example.invalid", "test-token", None, None);
    WsTradeClient::with_session(session, ClientConfig::default()).expect("client builds")
}

#[test]
fn ticker_round_trips_supported_exchanges() {
    for input in ["AAPL", "AAPL:NASDAQ", "SU:TSX", "AC:TSX-V", "BTC:CC", "CYBN:NEO"] {
        let ticker = Ticker::parse(input).expect(input);
        assert_eq!(ticker.to_string(), input);
    }
}

#[test]
fn ticker_rejects_bad_input() {
    assert!(matches!(Ticker::parse(""), Err(Error::InvalidTicker(_))));
    assert!(matches!(
        Ticker::from_parts(None, Some("NASDAQ"), None),
        Err(Error::InvalidTicker(_))
    ));
    assert!(matches!(
        Ticker::parse("AAPL:ME"),
        Err(Error::InvalidExchange(_))
    ));
}

#[test]
fn ticker_weak_equality_table() {
    let parse = |s: &str| Ticker::parse(s).unwrap();
    assert!(parse("AAPL:NASDAQ").weak_eq(&parse("AAPL")));
    assert!(!parse("AAPL").weak_eq(&parse("SU")));
    assert!(!parse("ETH:CC").weak_eq(&parse("ETH")));
    assert!(parse("BTC:CC").weak_eq(&parse("BTC:CC")));
}

#[test]
fn fifo_cache_evicts_by_insertion_order() {
    let capacity = 5;
    let mut cache = FifoCache::new(capacity);
    assert_eq!(cache.capacity(), capacity);

    for i in 0..=capacity {
        cache.insert(format!("key-{}", i), i);
    }

    assert!(cache.get(&"key-0".to_string()).is_none());
    for i in 1..=capacity {
        assert_eq!(cache.get(&format!("key-{}", i)), Some(&i));
    }
}

#[test]
fn token_store_merges_partial_updates() {
    let mut store = TokenStore::new();
    store.store(TokenUpdate::full("a", "b", 1000));
    store.store(TokenUpdate::default());

    assert_eq!(store.expires(), Some(1000));
    assert!(store.access().is_some());
    assert!(store.refresh().is_some());

    assert!(store.expired_at(1000));
    assert!(!store.expired_at(999));
}

#[tokio::test]
async fn session_resume_exposes_tokens_for_persistence() {
    init_logging();
    let session = Session::from_tokens(
        "https://example.invalid",
        "access-abc",
        Some("refresh-def".to_string()),
        Some(2_000_000_000),
    );
    let snapshot = session.tokens().await;
    assert_eq!(snapshot.access.as_deref(), Some("access-abc"));
    assert_eq!(snapshot.refresh.as_deref(), Some("refresh-def"));
    assert_eq!(snapshot.expires, Some(2_000_000_000));
}

#[test]
fn client_feature_defaults_and_toggles() {
    let client = offline_client();

    assert!(client.feature_enabled(Feature::ImplicitTokenRefresh));
    assert!(!client.feature_enabled(Feature::SecuritiesCache));

    client.set_feature("no_implicit_token_refresh").unwrap();
    assert!(!client.feature_enabled(Feature::ImplicitTokenRefresh));

    client.set_feature("implicit_token_refresh").unwrap();
    client.set_feature("securities_cache").unwrap();
    assert!(client.feature_enabled(Feature::ImplicitTokenRefresh));
    assert!(client.feature_enabled(Feature::SecuritiesCache));
}

#[test]
fn client_rejects_unknown_features_verbatim() {
    let client = offline_client();
    for input in ["unsupported", ""] {
        match client.set_feature(input) {
            Err(Error::UnsupportedFeature(name)) => {
                assert_eq!(name, input);
                assert!(Error::UnsupportedFeature(name).to_string().contains(input));
            }
            other => panic!("expected UnsupportedFeature for {:?}, got {:?}", input, other),
        }
    }
}

#[test]
fn header_registry_keeps_duplicates_in_order() {
    let registry = HeaderRegistry::new();
    registry.add("X-Trace", "first").unwrap();
    registry.add("X-Trace", "second").unwrap();
    registry.add("X-Other", "x").unwrap();

    assert_eq!(
        registry.values(),
        vec![
            ("x-trace".to_string(), "first".to_string()),
            ("x-trace".to_string(), "second".to_string()),
            ("x-other".to_string(), "x".to_string()),
        ]
    );

    registry.remove("X-Trace");
    assert_eq!(registry.values().len(), 1);

    registry.clear();
    assert!(registry.values().is_empty());
}

#[test]
fn client_headers_are_session_scoped() {
    let a = offline_client();
    let b = offline_client();
    a.headers().add("X-Only-A", "1").unwrap();
    assert_eq!(a.headers().values().len(), 1);
    assert!(b.headers().values().is_empty());
}
