use crate::components::storage::SharedStore;
use crate::components::Component;
use crate::config::Config;
use crate::error::CalResult;
use async_trait::async_trait;
use std::any::Any;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, RwLock};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub mod events;
pub mod poller;

pub use events::{EventKind, MeetingEvent};

/// Lifecycle notifier component
///
/// Owns the polling task. Shutdown cancels the task and waits for it to
/// stop so no event is emitted after the component reports done.
pub struct Notifier {
    events_tx: mpsc::Sender<MeetingEvent>,
    cancel: CancellationToken,
    task: RwLock<Option<JoinHandle<()>>>,
}

impl Notifier {
    pub fn new(events_tx: mpsc::Sender<MeetingEvent>) -> Self {
        Self {
            events_tx,
            cancel: CancellationToken::new(),
            task: RwLock::new(None),
        }
    }
}

#[async_trait]
impl Component for Notifier {
    fn name(&self) -> &'static str {
        "notifier"
    }

    async fn init(&self, config: Arc<RwLock<Config>>, store: SharedStore) -> CalResult<()> {
        let period = Duration::from_millis(config.read().await.poll_interval_ms);
        let task = poller::start_poller(store, self.events_tx.clone(), period, self.cancel.clone());
        *self.task.write().await = Some(task);
        Ok(())
    }

    async fn shutdown(&self) -> CalResult<()> {
        self.cancel.cancel();
        if let Some(task) = self.task.write().await.take() {
            let _ = task.await;
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
