use crate::components::schedule::models::{Meeting, MeetingId};
use crate::error::CalResult;
use async_trait::async_trait;
use std::sync::Arc;

pub mod memory;
pub mod redis;

pub use self::memory::MemoryStore;
pub use self::redis::RedisStore;

/// Persistence boundary for meeting records.
///
/// Implementations must keep `find_all` in insertion order and assign a
/// fresh positive id on `insert`. Any backend failure surfaces as
/// `Error::Storage`; callers propagate it without interpreting the cause
/// and without retrying.
#[async_trait]
pub trait MeetingStore: Send + Sync {
    /// Fetch every stored meeting
    async fn find_all(&self) -> CalResult<Vec<Meeting>>;

    /// Fetch the meeting stored under `id`, if any
    async fn find(&self, id: MeetingId) -> CalResult<Option<Meeting>>;

    /// Persist a new meeting, assigning its id, and return the stored record
    async fn insert(&self, meeting: Meeting) -> CalResult<Meeting>;

    /// Replace the fields of the meeting stored under `id`
    async fn update(&self, id: MeetingId, meeting: Meeting) -> CalResult<()>;

    /// Delete the meeting stored under `id`
    async fn remove(&self, id: MeetingId) -> CalResult<()>;

    /// Number of stored meetings
    async fn count(&self) -> CalResult<usize>;

    /// Release backend resources; default is a no-op
    async fn shutdown(&self) -> CalResult<()> {
        Ok(())
    }
}

/// Shared reference to a storage backend
pub type SharedStore = Arc<dyn MeetingStore>;
