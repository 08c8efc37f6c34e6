use crate::components::schedule::models::{Meeting, MeetingId};
use crate::components::storage::MeetingStore;
use crate::error::{storage_error, CalResult};
use async_trait::async_trait;
use tokio::sync::RwLock;

/// In-memory meeting store
///
/// The default backend. Keeps meetings in a `Vec` behind an async
/// `RwLock`, so `find_all` is insertion order for free. Ids count up
/// from 1 and are never reused within a run.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    meetings: Vec<Meeting>,
    last_id: MeetingId,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MeetingStore for MemoryStore {
    async fn find_all(&self) -> CalResult<Vec<Meeting>> {
        Ok(self.inner.read().await.meetings.clone())
    }

    async fn find(&self, id: MeetingId) -> CalResult<Option<Meeting>> {
        Ok(self
            .inner
            .read()
            .await
            .meetings
            .iter()
            .find(|meeting| meeting.id == id)
            .cloned())
    }

    async fn insert(&self, mut meeting: Meeting) -> CalResult<Meeting> {
        let mut inner = self.inner.write().await;
        inner.last_id += 1;
        meeting.id = inner.last_id;
        inner.meetings.push(meeting.clone());
        Ok(meeting)
    }

    async fn update(&self, id: MeetingId, mut meeting: Meeting) -> CalResult<()> {
        let mut inner = self.inner.write().await;
        let slot = inner
            .meetings
            .iter_mut()
            .find(|stored| stored.id == id)
            .ok_or_else(|| storage_error(&format!("no stored meeting with id {id}")))?;
        meeting.id = id;
        *slot = meeting;
        Ok(())
    }

    async fn remove(&self, id: MeetingId) -> CalResult<()> {
        let mut inner = self.inner.write().await;
        let index = inner
            .meetings
            .iter()
            .position(|stored| stored.id == id)
            .ok_or_else(|| storage_error(&format!("no stored meeting with id {id}")))?;
        inner.meetings.remove(index);
        Ok(())
    }

    async fn count(&self) -> CalResult<usize> {
        Ok(self.inner.read().await.meetings.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn meeting(hour: u32) -> Meeting {
        Meeting::new(
            Utc.with_ymd_and_hms(2030, 6, 1, hour, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2030, 6, 1, hour + 1, 0, 0).unwrap(),
            None,
        )
    }

    #[tokio::test]
    async fn insert_assigns_increasing_ids() {
        let store = MemoryStore::new();
        let first = store.insert(meeting(10)).await.unwrap();
        let second = store.insert(meeting(12)).await.unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn find_all_preserves_insertion_order() {
        let store = MemoryStore::new();
        store.insert(meeting(14)).await.unwrap();
        store.insert(meeting(10)).await.unwrap();
        store.insert(meeting(12)).await.unwrap();
        let ids: Vec<_> = store
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn update_replaces_fields_but_keeps_id() {
        let store = MemoryStore::new();
        let stored = store.insert(meeting(10)).await.unwrap();
        store.update(stored.id, meeting(16)).await.unwrap();
        let fetched = store.find(stored.id).await.unwrap().unwrap();
        assert_eq!(fetched.id, stored.id);
        assert_eq!(fetched.begin, meeting(16).begin);
    }

    #[tokio::test]
    async fn update_unknown_id_is_an_error() {
        let store = MemoryStore::new();
        assert!(store.update(99, meeting(10)).await.is_err());
    }

    #[tokio::test]
    async fn remove_deletes_and_ids_are_not_reused() {
        let store = MemoryStore::new();
        let first = store.insert(meeting(10)).await.unwrap();
        store.remove(first.id).await.unwrap();
        assert!(store.find(first.id).await.unwrap().is_none());
        let next = store.insert(meeting(12)).await.unwrap();
        assert_eq!(next.id, 2);
    }

    #[tokio::test]
    async fn remove_unknown_id_is_an_error() {
        let store = MemoryStore::new();
        assert!(store.remove(7).await.is_err());
    }
}
