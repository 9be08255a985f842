//! End-to-end runs of the notifier pipeline with in-memory stand-ins for
//! the feed, the revision marker and the delivery channel.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use svitlo_core::{FeedDocument, Fingerprint};
use svitlo_notify::{Dispatcher, Notification, Notifier, NotifyError};
use svitlo_report::{ReportBuilder, ReportRenderer, GROUP_SEPARATOR, UKRAINIAN};
use svitlo_runner::{
    FeedError, FeedSource, FileRevisionStore, MemoryRevisionStore, Pipeline, RevisionStore,
    RunError, RunOutcome, StoreError,
};

// 2026-10-14 00:00 and 2026-10-15 00:00 in Kyiv.
const TODAY: i64 = 1_791_925_200;
const TOMORROW: i64 = 1_792_011_600;

/// Serves a fixed document, or fails when `None`.
struct StaticFeed(Option<FeedDocument>);

#[async_trait]
impl FeedSource for StaticFeed {
    async fn fetch(&self) -> Result<FeedDocument, FeedError> {
        match &self.0 {
            Some(doc) => Ok(doc.clone()),
            None => Err(FeedError::Io(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                "feed timed out",
            ))),
        }
    }

    fn describe(&self) -> String {
        "static".to_string()
    }
}

/// Counts fetches before delegating to a [`StaticFeed`].
struct CountingFeed {
    inner: StaticFeed,
    fetches: Arc<AtomicUsize>,
}

#[async_trait]
impl FeedSource for CountingFeed {
    async fn fetch(&self) -> Result<FeedDocument, FeedError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.inner.fetch().await
    }

    fn describe(&self) -> String {
        "counting".to_string()
    }
}

/// Marker store whose reads or writes fail.
struct BrokenStore {
    fail_read: bool,
}

impl BrokenStore {
    fn error() -> StoreError {
        StoreError::Io {
            path: "/readonly/last_hash.txt".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        }
    }
}

impl RevisionStore for BrokenStore {
    fn read(&self) -> Result<Option<Fingerprint>, StoreError> {
        if self.fail_read {
            Err(Self::error())
        } else {
            Ok(None)
        }
    }

    fn write(&self, _fingerprint: &Fingerprint) -> Result<(), StoreError> {
        Err(Self::error())
    }
}

/// Records every payload it receives.
#[derive(Default)]
struct RecordingNotifier {
    sent: Arc<Mutex<Vec<String>>>,
    fail: bool,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        self.sent.lock().unwrap().push(notification.body.clone());
        if self.fail {
            Err(NotifyError::Api("channel down".to_string()))
        } else {
            Ok(())
        }
    }

    fn channel_name(&self) -> &str {
        "recording"
    }
}

fn feed(hash: &str, today: &str, tomorrow: &str) -> FeedDocument {
    serde_json::from_str(&format!(
        r#"{{
            "meta": {{ "contentHash": "{hash}" }},
            "fact": {{ "data": {{
                "{TODAY}": {{ "GPV12.1": {today}, "GPV18.1": {today} }},
                "{TOMORROW}": {{ "GPV12.1": {tomorrow}, "GPV18.1": {tomorrow} }}
            }} }}
        }}"#
    ))
    .unwrap()
}

fn default_feed(hash: &str) -> FeedDocument {
    feed(hash, r#"{ "1": "no", "2": "no" }"#, r#"{ "5": "first" }"#)
}

struct Harness {
    store: Arc<MemoryRevisionStore>,
    sent: Arc<Mutex<Vec<String>>>,
}

impl Harness {
    fn new(marker: Option<&str>) -> Self {
        Self {
            store: Arc::new(MemoryRevisionStore::new(marker.map(Fingerprint::new))),
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn pipeline(&self, doc: Option<FeedDocument>, fail: bool, max_len: usize) -> Pipeline {
        self.pipeline_with(
            Box::new(StaticFeed(doc)),
            Box::new(self.store.clone()),
            fail,
            max_len,
        )
    }

    fn pipeline_with(
        &self,
        source: Box<dyn FeedSource>,
        store: Box<dyn RevisionStore>,
        fail: bool,
        max_len: usize,
    ) -> Pipeline {
        let builder = ReportBuilder::new(
            ReportRenderer::new(&UKRAINIAN).with_group_prefix("GPV"),
            vec!["GPV12.1".to_string(), "GPV18.1".to_string()],
            chrono_tz::Europe::Kyiv,
        );
        let notifier = RecordingNotifier {
            sent: self.sent.clone(),
            fail,
        };
        Pipeline::new(
            source,
            store,
            builder,
            Some(Dispatcher::new(Box::new(notifier))),
            max_len,
        )
    }

    fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }

    fn marker(&self) -> Option<String> {
        self.store.current().map(|f| f.as_str().to_string())
    }
}

#[tokio::test]
async fn first_run_delivers_and_commits() {
    let h = Harness::new(None);
    let outcome = h.pipeline(Some(default_feed("rev-1")), false, 4000).run_once().await.unwrap();

    assert_eq!(
        outcome,
        RunOutcome::Delivered {
            fingerprint: Fingerprint::new("rev-1"),
            parts: 1
        }
    );
    assert_eq!(h.marker().as_deref(), Some("rev-1"));

    let sent = h.sent();
    assert_eq!(sent.len(), 1);
    let text = &sent[0];
    assert!(text.starts_with(
        "🗓 Графік відключень на сьогодні, 14.10 (Середа), група 12.1:\n\
         🪫00:00 - 02:00 (2 години)\n\
         🔋02:00 - 24:00 (22 години)\n\
         \n\
         Світло є 22 години\n\
         Світла нема 2 години\n---\n"
    ));
    assert!(text.contains("🪫04:00 - 04:30 (0.5 години)"));
    assert!(text.contains("на завтра, 15.10 (Четвер), група 18.1:"));
    assert_eq!(text.matches(GROUP_SEPARATOR).count(), 1);
}

#[tokio::test]
async fn same_revision_twice_sends_once() {
    let h = Harness::new(None);
    h.pipeline(Some(default_feed("rev-1")), false, 4000).run_once().await.unwrap();
    let second = h.pipeline(Some(default_feed("rev-1")), false, 4000).run_once().await.unwrap();

    assert_eq!(
        second,
        RunOutcome::Unchanged {
            fingerprint: Fingerprint::new("rev-1")
        }
    );
    assert_eq!(h.sent().len(), 1);
    assert_eq!(h.marker().as_deref(), Some("rev-1"));
}

#[tokio::test]
async fn new_revision_is_delivered() {
    let h = Harness::new(Some("rev-1"));
    let outcome = h.pipeline(Some(default_feed("rev-2")), false, 4000).run_once().await.unwrap();
    assert!(matches!(outcome, RunOutcome::Delivered { .. }));
    assert_eq!(h.sent().len(), 1);
    assert_eq!(h.marker().as_deref(), Some("rev-2"));
}

#[tokio::test]
async fn failed_delivery_keeps_marker_and_retries_next_run() {
    let h = Harness::new(Some("rev-1"));
    let err = h
        .pipeline(Some(default_feed("rev-2")), true, 4000)
        .run_once()
        .await
        .unwrap_err();
    assert!(matches!(err, RunError::DeliveryFailure(_)));
    assert_eq!(h.marker().as_deref(), Some("rev-1"));

    // The next run sees the revision as new again.
    let outcome = h.pipeline(Some(default_feed("rev-2")), false, 4000).run_once().await.unwrap();
    assert!(matches!(outcome, RunOutcome::Delivered { .. }));
    assert_eq!(h.sent().len(), 2);
    assert_eq!(h.marker().as_deref(), Some("rev-2"));
}

#[tokio::test]
async fn failed_chunk_aborts_the_rest() {
    let h = Harness::new(None);
    let err = h
        .pipeline(Some(default_feed("rev-1")), true, 200)
        .run_once()
        .await
        .unwrap_err();
    assert!(matches!(err, RunError::DeliveryFailure(NotifyError::Undelivered { part: 1, parts: 2, .. })));
    assert_eq!(h.sent().len(), 1);
    assert_eq!(h.marker(), None);
}

#[tokio::test]
async fn oversized_report_splits_per_group() {
    let h = Harness::new(None);
    let outcome = h.pipeline(Some(default_feed("rev-1")), false, 400).run_once().await.unwrap();
    assert!(matches!(outcome, RunOutcome::Delivered { parts: 2, .. }));

    let sent = h.sent();
    assert_eq!(sent.len(), 2);
    assert!(sent[0].starts_with("🗓 Графік відключень на сьогодні, 14.10 (Середа), група 12.1:"));
    assert!(sent[1].starts_with("🗓 Графік відключень на сьогодні, 14.10 (Середа), група 18.1:"));
    for part in &sent {
        assert!(!part.contains(GROUP_SEPARATOR));
        assert!(part.contains("\n---\n"));
    }
}

#[tokio::test]
async fn feed_failure_touches_nothing() {
    let h = Harness::new(Some("rev-1"));
    let err = h.pipeline(None, false, 4000).run_once().await.unwrap_err();
    assert!(matches!(err, RunError::FeedUnavailable(_)));
    assert!(h.sent().is_empty());
    assert_eq!(h.marker().as_deref(), Some("rev-1"));
}

#[tokio::test]
async fn empty_feed_is_not_committed() {
    let h = Harness::new(None);
    let doc: FeedDocument = serde_json::from_str(r#"{"meta":{"contentHash":"rev-9"}}"#).unwrap();
    let outcome = h.pipeline(Some(doc), false, 4000).run_once().await.unwrap();
    assert!(matches!(outcome, RunOutcome::NothingToReport { .. }));
    assert!(h.sent().is_empty());
    assert_eq!(h.marker(), None);
}

#[tokio::test]
async fn force_resends_known_revision() {
    let h = Harness::new(Some("rev-1"));
    let outcome = h
        .pipeline(Some(default_feed("rev-1")), false, 4000)
        .with_force(true)
        .run_once()
        .await
        .unwrap();
    assert!(matches!(outcome, RunOutcome::Delivered { parts: 1, .. }));
    assert_eq!(h.sent().len(), 1);
}

#[tokio::test]
async fn dry_run_renders_without_delivery() {
    let store = Arc::new(MemoryRevisionStore::default());
    let builder = ReportBuilder::new(
        ReportRenderer::new(&UKRAINIAN).with_group_prefix("GPV"),
        vec!["GPV12.1".to_string()],
        chrono_tz::Europe::Kyiv,
    );
    let pipeline = Pipeline::new(
        Box::new(StaticFeed(Some(default_feed("rev-1")))),
        Box::new(store.clone()),
        builder,
        None,
        4000,
    );

    match pipeline.run_once().await.unwrap() {
        RunOutcome::DryRun { fingerprint, payloads } => {
            assert_eq!(fingerprint.as_str(), "rev-1");
            assert_eq!(payloads.len(), 1);
            assert!(payloads[0].contains("група 12.1"));
            assert!(!payloads[0].contains("група 18.1"));
        }
        other => panic!("expected dry run, got {other:?}"),
    }
    assert_eq!(store.current(), None);
}

fn unhashed_feed() -> FeedDocument {
    serde_json::from_str(&format!(
        r#"{{ "fact": {{ "data": {{ "{TODAY}": {{ "GPV12.1": {{ "1": "no" }} }} }} }} }}"#
    ))
    .unwrap()
}

#[tokio::test]
async fn unhashed_feed_is_sent_once_across_runs() {
    let dir = tempfile::tempdir().unwrap();
    let marker = dir.path().join("last_hash.txt");
    let h = Harness::new(None);

    let first = h
        .pipeline_with(
            Box::new(StaticFeed(Some(unhashed_feed()))),
            Box::new(FileRevisionStore::new(&marker)),
            false,
            4000,
        )
        .run_once()
        .await
        .unwrap();
    assert!(matches!(first, RunOutcome::Delivered { parts: 1, .. }));

    let second = h
        .pipeline_with(
            Box::new(StaticFeed(Some(unhashed_feed()))),
            Box::new(FileRevisionStore::new(&marker)),
            false,
            4000,
        )
        .run_once()
        .await
        .unwrap();
    assert_eq!(
        second,
        RunOutcome::Unchanged {
            fingerprint: Fingerprint::default()
        }
    );
    assert_eq!(h.sent().len(), 1);
}

#[tokio::test]
async fn marker_write_failure_reported_after_delivery() {
    let h = Harness::new(None);
    let err = h
        .pipeline_with(
            Box::new(StaticFeed(Some(default_feed("rev-1")))),
            Box::new(BrokenStore { fail_read: false }),
            false,
            4000,
        )
        .run_once()
        .await
        .unwrap_err();
    assert!(matches!(err, RunError::Store(_)));
    assert!(err.to_string().contains("/readonly/last_hash.txt"));
    assert_eq!(h.sent().len(), 1);
}

#[tokio::test]
async fn marker_read_failure_aborts_before_fetch() {
    let h = Harness::new(None);
    let fetches = Arc::new(AtomicUsize::new(0));
    let source = CountingFeed {
        inner: StaticFeed(Some(default_feed("rev-1"))),
        fetches: fetches.clone(),
    };
    let err = h
        .pipeline_with(Box::new(source), Box::new(BrokenStore { fail_read: true }), false, 4000)
        .run_once()
        .await
        .unwrap_err();
    assert!(matches!(err, RunError::Store(_)));
    assert_eq!(fetches.load(Ordering::SeqCst), 0);
    assert!(h.sent().is_empty());
}
