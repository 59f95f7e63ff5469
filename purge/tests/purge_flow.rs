//! End-to-end purge flows against a mock durable store.

use std::future::{Future, ready};
use std::time::Duration;

use scour_purge::{
    CacheError, DurableStoreConfig, MemoryCache, PurgeConfig, PurgeCoordinator,
    RELEASE_TOKEN_HEADER, SessionCache, SigningConfig, SigningSecret, verify_release_token,
};
use scour_types::{BusinessId, GrantId, PurgeIdentity, SessionKey, UserId};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn identity() -> PurgeIdentity {
    PurgeIdentity::new(
        UserId::new("usr-flow"),
        BusinessId::new("biz-flow"),
        GrantId::new("grant-flow"),
    )
}

fn signing() -> SigningConfig {
    SigningConfig::new(SigningSecret::new("flow-test-secret"), "durable-store", "scour").unwrap()
}

fn config_for(server: &MockServer) -> PurgeConfig {
    PurgeConfig {
        durable_store: Some(
            DurableStoreConfig::new(server.uri())
                .unwrap()
                .with_timeout(Duration::from_millis(200)),
        ),
        signing: signing(),
    }
}

fn seeded_cache() -> MemoryCache {
    let cache = MemoryCache::new();
    cache.insert(identity().cache_key(), "live-session");
    cache
}

struct FailingCache;

impl SessionCache for FailingCache {
    fn drop_entry(&self, _key: &str) -> impl Future<Output = Result<(), CacheError>> + Send {
        ready(Err(CacheError::Backend("connection lost".to_string())))
    }
}

#[tokio::test]
async fn purge_clears_both_stores_and_authorizes_with_a_release_token() {
    init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/state/"))
        .and(query_param("userId", "usr-flow"))
        .and(query_param("businessId", "biz-flow"))
        .and(query_param("grantId", "grant-flow"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server);
    let cache = seeded_cache();
    let coordinator = PurgeCoordinator::new(&config, cache);

    let session_key = SessionKey::new("sess-live");
    let result = coordinator
        .purge(&identity(), Some(&session_key))
        .await
        .unwrap();

    assert!(result.overall_success());
    assert!(result.durable_cleared());
    assert!(result.cache_cleared());

    // The store saw exactly one request, authorized by a token scoped
    // to the purged owner.
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let token = requests[0]
        .headers
        .get(RELEASE_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .expect("release token header must be present");

    let claims = verify_release_token(token, &config.signing).unwrap();
    assert_eq!(claims.sub, "usr-flow");
    assert_eq!(claims.purpose, "lock-release");
    assert_eq!(claims.aud, "durable-store");
    assert_eq!(claims.iss, "scour");
    assert!(claims.exp > claims.iat);
}

#[tokio::test]
async fn purge_removes_the_cache_entry_for_the_identity() {
    init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/state/"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let cache = seeded_cache();
    assert!(cache.contains(&identity().cache_key()));
    let coordinator = PurgeCoordinator::new(&config_for(&server), cache);

    let session_key = SessionKey::new("sess-live");
    coordinator
        .purge(&identity(), Some(&session_key))
        .await
        .unwrap();

    assert!(coordinator.cache().is_empty());
}

#[tokio::test]
async fn a_missing_record_counts_as_cleared() {
    init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/state/"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let coordinator = PurgeCoordinator::new(&config_for(&server), seeded_cache());

    let session_key = SessionKey::new("sess-live");
    let result = coordinator
        .purge(&identity(), Some(&session_key))
        .await
        .unwrap();

    assert!(result.durable_cleared());
    assert!(result.overall_success());
}

#[tokio::test]
async fn unconfigured_durable_store_makes_purge_a_no_op() {
    init_tracing();
    // A server exists but the config does not point at it: nothing may
    // be called.
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let config = PurgeConfig {
        durable_store: None,
        signing: signing(),
    };
    let cache = seeded_cache();
    let coordinator = PurgeCoordinator::new(&config, cache);

    let session_key = SessionKey::new("sess-live");
    let result = coordinator
        .purge(&identity(), Some(&session_key))
        .await
        .unwrap();

    assert!(result.was_skipped());
    assert!(result.overall_success());
    // The cache entry is untouched as well.
    assert!(coordinator.cache().contains(&identity().cache_key()));
}

#[tokio::test]
async fn durable_failure_is_reported_not_thrown_and_cache_still_drops() {
    init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/state/"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let coordinator = PurgeCoordinator::new(&config_for(&server), seeded_cache());

    let session_key = SessionKey::new("sess-live");
    let result = coordinator
        .purge(&identity(), Some(&session_key))
        .await
        .unwrap();

    assert!(!result.durable_cleared());
    assert!(result.cache_cleared());
    assert!(!result.overall_success());
    assert!(coordinator.cache().is_empty());
}

#[tokio::test]
async fn cache_failure_is_reported_not_thrown() {
    init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/state/"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let coordinator = PurgeCoordinator::new(&config_for(&server), FailingCache);

    let session_key = SessionKey::new("sess-live");
    let result = coordinator
        .purge(&identity(), Some(&session_key))
        .await
        .unwrap();

    assert!(result.durable_cleared());
    assert!(!result.cache_cleared());
    assert!(!result.overall_success());
}

#[tokio::test]
async fn missing_session_key_skips_the_cache_drop_without_failing() {
    init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/state/"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let cache = seeded_cache();
    let coordinator = PurgeCoordinator::new(&config_for(&server), cache);

    let result = coordinator.purge(&identity(), None).await.unwrap();

    assert!(result.overall_success());
    assert!(result.cache_cleared());
    // Nothing was dropped: there was no session key to act on.
    assert!(coordinator.cache().contains(&identity().cache_key()));
}

#[tokio::test]
async fn a_hung_durable_store_bounds_the_purge_and_reports_failure() {
    init_tracing();
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/state/"))
        .respond_with(ResponseTemplate::new(204).set_delay(Duration::from_millis(500)))
        .expect(1)
        .mount(&server)
        .await;

    let coordinator = PurgeCoordinator::new(&config_for(&server), seeded_cache());

    let session_key = SessionKey::new("sess-live");
    let result = coordinator
        .purge(&identity(), Some(&session_key))
        .await
        .unwrap();

    assert!(!result.durable_cleared());
    // The cache drop is unconditional: a slow durable store must not
    // leave the live-session entry behind.
    assert!(result.cache_cleared());
    assert!(coordinator.cache().is_empty());
}
