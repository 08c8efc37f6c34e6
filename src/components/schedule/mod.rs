use crate::components::storage::SharedStore;
use crate::components::Component;
use crate::config::Config;
use crate::error::CalResult;
use async_trait::async_trait;
use std::any::Any;
use std::sync::Arc;
use tokio::sync::RwLock;

pub mod engine;
pub mod models;
pub mod printer;
pub mod validate;

pub use engine::{ScheduleEngine, ScheduleHandle};
pub use models::{Meeting, MeetingId};

/// Scheduling component
///
/// Wraps the engine so the rest of the app can fetch a handle through
/// the component manager after init.
#[derive(Default)]
pub struct Schedule {
    handle: RwLock<Option<ScheduleHandle>>,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle to the engine; `None` before init
    pub async fn get_handle(&self) -> Option<ScheduleHandle> {
        self.handle.read().await.clone()
    }
}

#[async_trait]
impl Component for Schedule {
    fn name(&self) -> &'static str {
        "schedule"
    }

    async fn init(&self, _config: Arc<RwLock<Config>>, store: SharedStore) -> CalResult<()> {
        *self.handle.write().await = Some(ScheduleHandle::new(store));
        Ok(())
    }

    async fn shutdown(&self) -> CalResult<()> {
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
