use async_trait::async_trait;
use chrono::{DateTime, Duration as TimeDelta, Utc};
use kokous::components::notifier::poller::start_poller;
use kokous::components::notifier::EventKind;
use kokous::components::schedule::models::{Meeting, MeetingId};
use kokous::components::storage::{MeetingStore, MemoryStore, SharedStore};
use kokous::error::{storage_error, CalResult};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

fn in_ms(ms: i64) -> DateTime<Utc> {
    Utc::now() + TimeDelta::milliseconds(ms)
}

/// Store that fails its first few reads, then recovers
struct FlakyStore {
    inner: MemoryStore,
    failures_left: AtomicUsize,
}

impl FlakyStore {
    fn new(failures: usize) -> Self {
        Self {
            inner: MemoryStore::new(),
            failures_left: AtomicUsize::new(failures),
        }
    }
}

#[async_trait]
impl MeetingStore for FlakyStore {
    async fn find_all(&self) -> CalResult<Vec<Meeting>> {
        if self.failures_left.load(Ordering::SeqCst) > 0 {
            self.failures_left.fetch_sub(1, Ordering::SeqCst);
            return Err(storage_error("backend unavailable"));
        }
        self.inner.find_all().await
    }

    async fn find(&self, id: MeetingId) -> CalResult<Option<Meeting>> {
        self.inner.find(id).await
    }

    async fn insert(&self, meeting: Meeting) -> CalResult<Meeting> {
        self.inner.insert(meeting).await
    }

    async fn update(&self, id: MeetingId, meeting: Meeting) -> CalResult<()> {
        self.inner.update(id, meeting).await
    }

    async fn remove(&self, id: MeetingId) -> CalResult<()> {
        self.inner.remove(id).await
    }

    async fn count(&self) -> CalResult<usize> {
        self.inner.count().await
    }
}

/// The poller walks a meeting through its whole lifecycle, each event
/// exactly once, then goes quiet
#[tokio::test]
async fn test_poller_emits_the_full_lifecycle_exactly_once() {
    let store: SharedStore = Arc::new(MemoryStore::new());
    let meeting = store
        .insert(Meeting::new(in_ms(150), in_ms(300), Some(in_ms(50))))
        .await
        .unwrap();

    let (events_tx, mut events_rx) = mpsc::channel(32);
    let cancel = CancellationToken::new();
    let task = start_poller(
        Arc::clone(&store),
        events_tx,
        Duration::from_millis(10),
        cancel.clone(),
    );

    let mut kinds = Vec::new();
    while kinds.last() != Some(&EventKind::Finished) {
        let event = tokio::time::timeout(Duration::from_secs(2), events_rx.recv())
            .await
            .expect("timed out waiting for lifecycle events")
            .expect("event channel closed early");
        assert_eq!(event.meeting_id, meeting.id);
        kinds.push(event.kind);
    }

    assert_eq!(
        kinds,
        vec![EventKind::Notified, EventKind::Started, EventKind::Finished]
    );

    // Every instant has fired; nothing more may arrive
    let extra = tokio::time::timeout(Duration::from_millis(100), events_rx.recv()).await;
    assert!(extra.is_err());

    cancel.cancel();
    task.await.unwrap();
}

/// An instant crossed while the store is down still fires once the
/// store recovers
#[tokio::test]
async fn test_fetch_failures_do_not_lose_events() {
    let store = Arc::new(FlakyStore::new(10));
    store
        .insert(Meeting::new(in_ms(40), in_ms(60_000), None))
        .await
        .unwrap();
    let shared: SharedStore = store;

    let (events_tx, mut events_rx) = mpsc::channel(32);
    let cancel = CancellationToken::new();
    let task = start_poller(
        Arc::clone(&shared),
        events_tx,
        Duration::from_millis(10),
        cancel.clone(),
    );

    let event = tokio::time::timeout(Duration::from_secs(2), events_rx.recv())
        .await
        .expect("timed out waiting for the start event")
        .expect("event channel closed early");
    assert_eq!(event.kind, EventKind::Started);

    // Exactly once, despite the failed polls in between
    let extra = tokio::time::timeout(Duration::from_millis(100), events_rx.recv()).await;
    assert!(extra.is_err());

    cancel.cancel();
    task.await.unwrap();
}

/// Cancellation stops the polling task promptly
#[tokio::test]
async fn test_cancellation_stops_the_poller() {
    let store: SharedStore = Arc::new(MemoryStore::new());
    let (events_tx, mut events_rx) = mpsc::channel(32);
    let cancel = CancellationToken::new();
    let task = start_poller(store, events_tx, Duration::from_millis(10), cancel.clone());

    cancel.cancel();
    tokio::time::timeout(Duration::from_secs(2), task)
        .await
        .expect("poller did not stop after cancellation")
        .unwrap();

    // The sender side is gone once the task exits
    assert!(events_rx.recv().await.is_none());
}

/// The poller winds down on its own when nobody listens anymore
#[tokio::test]
async fn test_poller_stops_when_the_sink_closes() {
    let store: SharedStore = Arc::new(MemoryStore::new());
    store
        .insert(Meeting::new(in_ms(30), in_ms(60), None))
        .await
        .unwrap();

    let (events_tx, events_rx) = mpsc::channel(32);
    drop(events_rx);

    let cancel = CancellationToken::new();
    let task = start_poller(store, events_tx, Duration::from_millis(10), cancel);

    tokio::time::timeout(Duration::from_secs(2), task)
        .await
        .expect("poller did not stop after the sink closed")
        .unwrap();
}
