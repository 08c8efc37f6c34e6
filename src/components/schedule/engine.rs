use crate::components::schedule::models::{Meeting, MeetingId};
use crate::components::schedule::validate::{self, InvalidMeeting};
use crate::components::storage::{MeetingStore, SharedStore};
use crate::error::{CalResult, Error};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// The scheduling engine
///
/// All mutations take the same read-validate-write path: fetch the
/// current meetings, check the candidate against them, then persist.
/// `write_lock` is held across that whole path so concurrent mutations
/// cannot both validate against the same snapshot and admit a conflict.
/// Reads skip the lock; a caller racing a write may see either side.
pub struct ScheduleEngine {
    store: SharedStore,
    write_lock: Mutex<()>,
}

impl ScheduleEngine {
    pub fn new(store: SharedStore) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Schedule a new meeting and return the stored record with its id
    pub async fn add(
        &self,
        begin: DateTime<Utc>,
        end: DateTime<Utc>,
        notify_at: Option<DateTime<Utc>>,
    ) -> CalResult<Meeting> {
        let _guard = self.write_lock.lock().await;

        let candidate = Meeting::new(begin, end, notify_at);
        let existing = self.store.find_all().await?;
        validate::check_meeting(&candidate, &existing, Utc::now())?;

        let stored = self.store.insert(candidate).await?;
        debug!(id = stored.id, "Scheduled meeting");
        Ok(stored)
    }

    /// Replace the times of an existing meeting
    ///
    /// The stored meeting itself is left out of the conflict check, so
    /// re-saving a meeting over its own slot is legal.
    pub async fn edit(
        &self,
        id: MeetingId,
        begin: DateTime<Utc>,
        end: DateTime<Utc>,
        notify_at: Option<DateTime<Utc>>,
    ) -> CalResult<Meeting> {
        let _guard = self.write_lock.lock().await;

        if self.store.find(id).await?.is_none() {
            return Err(Error::NotFound(id));
        }

        let candidate = Meeting::with_id(id, begin, end, notify_at);
        let others: Vec<Meeting> = self
            .store
            .find_all()
            .await?
            .into_iter()
            .filter(|meeting| meeting.id != id)
            .collect();
        validate::check_meeting(&candidate, &others, Utc::now())?;

        self.store.update(id, candidate.clone()).await?;
        debug!(id, "Rescheduled meeting");
        Ok(candidate)
    }

    /// Attach a notification time to a meeting that has none yet
    pub async fn add_notification(
        &self,
        id: MeetingId,
        notify_at: DateTime<Utc>,
    ) -> CalResult<Meeting> {
        let _guard = self.write_lock.lock().await;

        let mut meeting = self.store.find(id).await?.ok_or(Error::NotFound(id))?;
        if meeting.notify_at.is_some() {
            return Err(Error::AlreadyNotified(id));
        }
        if meeting.begin <= Utc::now() {
            return Err(InvalidMeeting::BeginInPast.into());
        }
        if notify_at >= meeting.begin {
            return Err(InvalidMeeting::NotifyAfterBegin.into());
        }

        meeting.notify_at = Some(notify_at);
        self.store.update(id, meeting.clone()).await?;
        debug!(id, "Added notification");
        Ok(meeting)
    }

    /// Cancel a meeting
    pub async fn remove(&self, id: MeetingId) -> CalResult<()> {
        let _guard = self.write_lock.lock().await;

        if self.store.find(id).await?.is_none() {
            return Err(Error::NotFound(id));
        }
        self.store.remove(id).await?;
        debug!(id, "Cancelled meeting");
        Ok(())
    }

    pub async fn find(&self, id: MeetingId) -> CalResult<Option<Meeting>> {
        self.store.find(id).await
    }

    pub async fn find_all(&self) -> CalResult<Vec<Meeting>> {
        self.store.find_all().await
    }

    pub async fn count(&self) -> CalResult<usize> {
        self.store.count().await
    }
}

/// Handle for talking to the scheduling engine
#[derive(Clone)]
pub struct ScheduleHandle {
    engine: Arc<ScheduleEngine>,
}

impl ScheduleHandle {
    pub fn new(store: SharedStore) -> Self {
        Self {
            engine: Arc::new(ScheduleEngine::new(store)),
        }
    }

    pub async fn add(
        &self,
        begin: DateTime<Utc>,
        end: DateTime<Utc>,
        notify_at: Option<DateTime<Utc>>,
    ) -> CalResult<Meeting> {
        self.engine.add(begin, end, notify_at).await
    }

    pub async fn edit(
        &self,
        id: MeetingId,
        begin: DateTime<Utc>,
        end: DateTime<Utc>,
        notify_at: Option<DateTime<Utc>>,
    ) -> CalResult<Meeting> {
        self.engine.edit(id, begin, end, notify_at).await
    }

    pub async fn add_notification(
        &self,
        id: MeetingId,
        notify_at: DateTime<Utc>,
    ) -> CalResult<Meeting> {
        self.engine.add_notification(id, notify_at).await
    }

    pub async fn remove(&self, id: MeetingId) -> CalResult<()> {
        self.engine.remove(id).await
    }

    pub async fn find(&self, id: MeetingId) -> CalResult<Option<Meeting>> {
        self.engine.find(id).await
    }

    pub async fn find_all(&self) -> CalResult<Vec<Meeting>> {
        self.engine.find_all().await
    }

    pub async fn count(&self) -> CalResult<usize> {
        self.engine.count().await
    }
}
