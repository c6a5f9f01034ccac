//! End-to-end tests: draft, sign, mine, re-sign, dispatch.

use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};
use std::time::Duration;

use notebridge::core::{committed_difficulty, meets_difficulty, MiningError, MiningProgress};
use notebridge::relay::{MemoryRelay, OkPrefix, PublishError, RelayBehavior, RelayError};
use notebridge::{
    CancelFlag, EventDraft, Kind, PowStatus, PublishRequest, Publisher, PublisherConfig,
    PublisherError, Relay, Tag, TimeoutFallback,
};
use notebridge_testkit::relay_network;

const SECRET: &str = "0000000000000000000000000000000000000000000000000000000000000001";

static TRACING: Once = Once::new();

fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

fn config() -> PublisherConfig {
    PublisherConfig {
        relay_timeout_ms: 300,
        ..PublisherConfig::default()
    }
    .with_secret_key(SECRET)
}

#[tokio::test]
async fn test_hello_world_with_pow() -> anyhow::Result<()> {
    init_tracing();
    let (network, relays) = relay_network(&[RelayBehavior::Accept, RelayBehavior::Accept]).await;
    let publisher = Publisher::new(config(), relays)?;

    let draft = publisher.draft(Kind::TEXT_NOTE, vec![Tag::hashtag("test")], "hello");
    let finalized = publisher.finalize(draft, 4, &CancelFlag::new()).await?;
    let event = finalized.event.clone();

    event.verify()?;
    assert!(event.id().to_hex().starts_with('0'));
    assert!(meets_difficulty(event.id(), 4));
    assert_eq!(event.kind(), Kind::TEXT_NOTE);
    assert_eq!(event.content(), "hello");
    assert_eq!(event.tags()[0], Tag::hashtag("test"));
    assert_eq!(event.tags().len(), 2);
    assert!(event.tags()[1].is_nonce());
    assert_eq!(committed_difficulty(event.tags()), Some(4));
    assert!(matches!(finalized.pow, PowStatus::Mined { difficulty: 4, .. }));

    let report = publisher.publish(event.clone()).await?;
    assert!(!report.is_partial());
    assert_eq!(report.event_id, *event.id());
    assert_eq!(network.replicas(event.id()).await, 2);

    // What the relay stored is byte-for-byte what we signed
    let stored = network.relay("mem://relay-00").await.unwrap().events().await;
    assert_eq!(stored, vec![(*event).clone()]);
    Ok(())
}

#[tokio::test]
async fn test_partial_failure_is_success_with_warnings() -> anyhow::Result<()> {
    init_tracing();
    let (network, relays) = relay_network(&[
        RelayBehavior::Accept,
        RelayBehavior::Unreachable,
        RelayBehavior::Reject("blocked: not allowed".into()),
    ])
    .await;
    let publisher = Publisher::new(config(), relays)?;

    let report = publisher
        .submit(PublishRequest::text_note("one of three").tag(Tag::hashtag("test")))
        .await?;

    assert!(report.is_partial());
    assert_eq!(report.accepted, vec!["mem://relay-00".to_string()]);
    assert_eq!(report.failures.len(), 2);
    assert!(report.summary().contains("1/3"));
    assert!(report.summary().contains("some relays failed"));
    assert_eq!(network.replicas(&report.event_id).await, 1);
    Ok(())
}

#[tokio::test]
async fn test_total_failure_is_an_error() -> anyhow::Result<()> {
    init_tracing();
    let (_network, relays) = relay_network(&[
        RelayBehavior::Unreachable,
        RelayBehavior::Unreachable,
        RelayBehavior::Reject("error: database offline".into()),
    ])
    .await;
    let publisher = Publisher::new(config(), relays)?;

    match publisher.submit(PublishRequest::text_note("nobody")).await {
        Err(PublisherError::Publish(PublishError::AllRelaysFailed { failures, .. })) => {
            assert_eq!(failures.len(), 3);
            assert!(matches!(failures[0].error, RelayError::Unreachable(_)));
            assert!(matches!(failures[2].error, RelayError::Rejected { .. }));
        }
        other => panic!("expected AllRelaysFailed, got {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn test_slow_relay_times_out() -> anyhow::Result<()> {
    init_tracing();
    let (_network, relays) = relay_network(&[
        RelayBehavior::Accept,
        RelayBehavior::Delay(Duration::from_secs(5)),
    ])
    .await;
    let publisher = Publisher::new(config(), relays)?;

    let report = publisher.submit(PublishRequest::text_note("tick")).await?;
    assert_eq!(report.failures.len(), 1);
    assert_eq!(
        report.failures[0].error,
        RelayError::Timeout(Duration::from_millis(300))
    );
    Ok(())
}

#[tokio::test]
async fn test_zero_difficulty_skips_mining() -> anyhow::Result<()> {
    init_tracing();
    let (_network, relays) = relay_network(&[RelayBehavior::Accept]).await;
    let publisher = Publisher::new(config(), relays)?;

    let draft = publisher.draft(Kind::TEXT_NOTE, vec![Tag::hashtag("test")], "no work");
    let finalized = publisher.finalize(draft, 0, &CancelFlag::new()).await?;

    assert_eq!(finalized.pow, PowStatus::Disabled);
    assert_eq!(finalized.event.tags(), &[Tag::hashtag("test")]);
    assert!(committed_difficulty(finalized.event.tags()).is_none());
    finalized.event.verify()?;
    Ok(())
}

#[tokio::test]
async fn test_relay_pow_policy() -> anyhow::Result<()> {
    init_tracing();
    let strict: Arc<dyn Relay> = Arc::new(MemoryRelay::new("mem://strict").with_min_pow(8));
    let publisher = Publisher::new(config(), vec![strict])?;

    // Fixed timestamp: the unmined id has only 2 leading zero bits
    let draft = EventDraft::new(
        publisher.public_key(),
        1700000000,
        Kind::TEXT_NOTE,
        Vec::new(),
        "lazy",
    );
    let unmined = publisher.finalize(draft, 0, &CancelFlag::new()).await?;
    assert_eq!(
        unmined.event.id().to_hex(),
        "27158eb26e0e04d76e36fe1ceaa9b74fca7d6dd9847c81f5bb6e4036cd06f416"
    );
    match publisher.publish(unmined.event).await {
        Err(PublisherError::Publish(PublishError::AllRelaysFailed { failures, .. })) => {
            assert!(matches!(
                failures[0].error,
                RelayError::Rejected {
                    prefix: Some(OkPrefix::Pow),
                    ..
                }
            ));
        }
        other => panic!("expected a proof-of-work rejection, got {:?}", other),
    }

    let report = publisher
        .submit(PublishRequest::text_note("diligent").difficulty(8))
        .await?;
    assert!(!report.is_partial());
    Ok(())
}

#[tokio::test]
async fn test_unreachable_difficulty_aborts() -> anyhow::Result<()> {
    init_tracing();
    let (network, relays) = relay_network(&[RelayBehavior::Accept]).await;
    let publisher =
        Publisher::new(config(), relays)?.with_mining_deadline(Duration::from_millis(100));

    let result = publisher
        .submit(PublishRequest::text_note("impossible").difficulty(256))
        .await;
    assert!(matches!(
        result,
        Err(PublisherError::Mining(MiningError::Timeout { difficulty: 256, .. }))
    ));

    // Nothing was published
    let relay = network.relay("mem://relay-00").await.unwrap();
    assert_eq!(relay.event_count().await, 0);
    Ok(())
}

#[tokio::test]
async fn test_unreachable_difficulty_with_fallback() -> anyhow::Result<()> {
    init_tracing();
    let (network, relays) = relay_network(&[RelayBehavior::Accept]).await;
    let config = PublisherConfig {
        timeout_fallback: TimeoutFallback::PublishUnmined,
        ..config()
    };
    let publisher = Publisher::new(config, relays)?.with_mining_deadline(Duration::from_millis(100));

    let report = publisher
        .submit(PublishRequest::text_note("best effort").difficulty(256))
        .await?;

    let stored = network.relay("mem://relay-00").await.unwrap().events().await;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id(), &report.event_id);
    assert!(stored[0].tags().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_cancellation_never_publishes() -> anyhow::Result<()> {
    init_tracing();
    let (network, relays) = relay_network(&[RelayBehavior::Accept]).await;
    let publisher = Arc::new(Publisher::new(config(), relays)?);

    let cancel = CancelFlag::new();
    let request = PublishRequest::text_note("stop me")
        .difficulty(256)
        .cancel_with(cancel.clone());

    let task = {
        let publisher = Arc::clone(&publisher);
        tokio::spawn(async move { publisher.submit(request).await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    cancel.cancel();

    let result = tokio::time::timeout(Duration::from_secs(10), task).await??;
    assert!(matches!(
        result,
        Err(PublisherError::Mining(MiningError::Cancelled { .. }))
    ));
    let relay = network.relay("mem://relay-00").await.unwrap();
    assert_eq!(relay.event_count().await, 0);
    Ok(())
}

#[tokio::test]
async fn test_abandoned_finalize_stops_mining() -> anyhow::Result<()> {
    init_tracing();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);

    let config = PublisherConfig {
        progress_interval_ms: 10,
        ..config()
    };
    let publisher = Publisher::new(config, Vec::new())?.with_mining_observer(Arc::new(
        move |_: &MiningProgress| {
            counter.fetch_add(1, Ordering::Relaxed);
        },
    ));

    let cancel = CancelFlag::new();
    let draft = publisher.draft(Kind::TEXT_NOTE, Vec::new(), "abandoned");
    let caller_deadline = tokio::time::timeout(
        Duration::from_millis(100),
        publisher.finalize(draft, 256, &cancel),
    )
    .await;
    assert!(caller_deadline.is_err());

    // Let the worker notice the dropped future
    tokio::time::sleep(Duration::from_millis(100)).await;
    let settled = calls.load(Ordering::Relaxed);
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(calls.load(Ordering::Relaxed), settled);

    // The caller's own flag is left alone
    assert!(!cancel.is_cancelled());
    Ok(())
}

#[tokio::test]
async fn test_mining_observer_is_advisory() -> anyhow::Result<()> {
    init_tracing();
    let (_network, relays) = relay_network(&[RelayBehavior::Accept]).await;
    let reports = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&reports);

    let config = PublisherConfig {
        progress_interval_ms: 0,
        ..config()
    };
    let publisher = Publisher::new(config, relays)?.with_mining_observer(Arc::new(
        move |p: &MiningProgress| {
            assert!(p.best_difficulty < p.difficulty);
            counter.fetch_add(1, Ordering::Relaxed);
        },
    ));

    let draft = publisher.draft(Kind::TEXT_NOTE, Vec::new(), "watched");
    let finalized = publisher.finalize(draft, 8, &CancelFlag::new()).await?;
    assert!(meets_difficulty(finalized.event.id(), 8));

    if let PowStatus::Mined { attempts, .. } = finalized.pow {
        assert_eq!(reports.load(Ordering::Relaxed) as u64, attempts - 1);
    } else {
        panic!("expected mined status");
    }
    Ok(())
}

#[tokio::test]
async fn test_config_from_file() -> anyhow::Result<()> {
    init_tracing();
    let mut file = tempfile::NamedTempFile::new()?;
    write!(
        file,
        r#"{{ "secret_key": "{}", "relay_timeout_ms": 1234, "timeout_fallback": "publish_unmined" }}"#,
        SECRET
    )?;

    let config = PublisherConfig::from_json_file(file.path())?;
    assert_eq!(config.relay_timeout_ms, 1234);
    assert_eq!(config.timeout_fallback, TimeoutFallback::PublishUnmined);

    let publisher = Publisher::new(config, Vec::new())?;
    assert_eq!(
        publisher.public_key().to_hex(),
        "79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"
    );
    Ok(())
}

#[tokio::test]
async fn test_invalid_key_rejected_at_construction() {
    let config = PublisherConfig::default().with_secret_key("zz");
    assert!(matches!(
        Publisher::new(config, Vec::new()),
        Err(PublisherError::SigningKey(_))
    ));

    let missing = tempfile::tempdir().unwrap().path().join("absent.json");
    assert!(matches!(
        PublisherConfig::from_json_file(missing),
        Err(PublisherError::Config(_))
    ));
}
