use crate::components::schedule::models::{Meeting, MeetingId};
use crate::components::storage::MeetingStore;
use crate::error::{storage_error, CalResult};
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use tokio::sync::mpsc;
use tracing::info;

/// Redis key constants
pub mod keys {
    /// Hash of meeting id -> serialized meeting
    pub const MEETINGS_HASH: &str = "kokous:meetings";
    /// Counter backing id assignment
    pub const MEETINGS_SEQ: &str = "kokous:meetings:seq";
}

/// Commands that can be sent to the Redis storage actor
pub enum StoreCommand {
    FindAll(mpsc::Sender<CalResult<Vec<Meeting>>>),
    Find(MeetingId, mpsc::Sender<CalResult<Option<Meeting>>>),
    Insert(Meeting, mpsc::Sender<CalResult<Meeting>>),
    Update(MeetingId, Meeting, mpsc::Sender<CalResult<()>>),
    Remove(MeetingId, mpsc::Sender<CalResult<()>>),
    Count(mpsc::Sender<CalResult<usize>>),
    Shutdown,
}

/// The actor that owns the Redis connection and processes storage commands
pub struct RedisStoreActor {
    connection: ConnectionManager,
    command_rx: mpsc::Receiver<StoreCommand>,
}

impl RedisStoreActor {
    /// Process commands until the channel closes or `Shutdown` arrives
    pub async fn run(&mut self) {
        info!("Redis storage actor started");

        while let Some(command) = self.command_rx.recv().await {
            match command {
                StoreCommand::FindAll(response_tx) => {
                    let result = self.find_all().await;
                    let _ = response_tx.send(result).await;
                }
                StoreCommand::Find(id, response_tx) => {
                    let result = self.find(id).await;
                    let _ = response_tx.send(result).await;
                }
                StoreCommand::Insert(meeting, response_tx) => {
                    let result = self.insert(meeting).await;
                    let _ = response_tx.send(result).await;
                }
                StoreCommand::Update(id, meeting, response_tx) => {
                    let result = self.update(id, meeting).await;
                    let _ = response_tx.send(result).await;
                }
                StoreCommand::Remove(id, response_tx) => {
                    let result = self.remove(id).await;
                    let _ = response_tx.send(result).await;
                }
                StoreCommand::Count(response_tx) => {
                    let result = self.count().await;
                    let _ = response_tx.send(result).await;
                }
                StoreCommand::Shutdown => {
                    info!("Redis storage actor shutting down");
                    break;
                }
            }
        }

        info!("Redis storage actor stopped");
    }

    async fn find_all(&mut self) -> CalResult<Vec<Meeting>> {
        let mut conn = self.connection.clone();
        let rows: Vec<String> = conn.hvals(keys::MEETINGS_HASH).await?;

        let mut meetings = Vec::with_capacity(rows.len());
        for row in rows {
            meetings.push(deserialize_meeting(&row)?);
        }
        // Hash iteration order is arbitrary; ids are assigned from a
        // monotonic counter, so sorting by id restores insertion order.
        meetings.sort_by_key(|meeting| meeting.id);
        Ok(meetings)
    }

    async fn find(&mut self, id: MeetingId) -> CalResult<Option<Meeting>> {
        let mut conn = self.connection.clone();
        let row: Option<String> = conn.hget(keys::MEETINGS_HASH, id).await?;
        match row {
            Some(json) => Ok(Some(deserialize_meeting(&json)?)),
            None => Ok(None),
        }
    }

    async fn insert(&mut self, mut meeting: Meeting) -> CalResult<Meeting> {
        let mut conn = self.connection.clone();
        let id: MeetingId = conn.incr(keys::MEETINGS_SEQ, 1).await?;
        meeting.id = id;
        let json = serialize_meeting(&meeting)?;
        let () = conn.hset(keys::MEETINGS_HASH, id, json).await?;
        Ok(meeting)
    }

    async fn update(&mut self, id: MeetingId, mut meeting: Meeting) -> CalResult<()> {
        let mut conn = self.connection.clone();
        let exists: bool = conn.hexists(keys::MEETINGS_HASH, id).await?;
        if !exists {
            return Err(storage_error(&format!("no stored meeting with id {id}")));
        }
        meeting.id = id;
        let json = serialize_meeting(&meeting)?;
        let () = conn.hset(keys::MEETINGS_HASH, id, json).await?;
        Ok(())
    }

    async fn remove(&mut self, id: MeetingId) -> CalResult<()> {
        let mut conn = self.connection.clone();
        let removed: i64 = conn.hdel(keys::MEETINGS_HASH, id).await?;
        if removed == 0 {
            return Err(storage_error(&format!("no stored meeting with id {id}")));
        }
        Ok(())
    }

    async fn count(&mut self) -> CalResult<usize> {
        let mut conn = self.connection.clone();
        let len: usize = conn.hlen(keys::MEETINGS_HASH).await?;
        Ok(len)
    }
}

fn serialize_meeting(meeting: &Meeting) -> CalResult<String> {
    serde_json::to_string(meeting)
        .map_err(|e| storage_error(&format!("Failed to serialize meeting: {}", e)))
}

fn deserialize_meeting(json: &str) -> CalResult<Meeting> {
    serde_json::from_str(json)
        .map_err(|e| storage_error(&format!("Failed to deserialize meeting: {}", e)))
}

/// Handle for communicating with the Redis storage actor
#[derive(Clone)]
pub struct RedisStore {
    command_tx: mpsc::Sender<StoreCommand>,
}

impl RedisStore {
    /// Connect to Redis and spawn the storage actor
    pub async fn connect(url: &str) -> CalResult<Self> {
        let client = Client::open(url)?;
        let connection = ConnectionManager::new(client).await?;

        let (command_tx, command_rx) = mpsc::channel(32);
        let mut actor = RedisStoreActor {
            connection,
            command_rx,
        };
        tokio::spawn(async move {
            actor.run().await;
        });

        Ok(Self { command_tx })
    }

    /// Create a handle with no actor behind it, for wiring up tests
    pub fn empty() -> Self {
        let (command_tx, _) = mpsc::channel(1);
        Self { command_tx }
    }

    async fn send(&self, command: StoreCommand) -> CalResult<()> {
        self.command_tx
            .send(command)
            .await
            .map_err(|e| storage_error(&format!("Storage actor mailbox error: {}", e)))
    }
}

#[async_trait]
impl MeetingStore for RedisStore {
    async fn find_all(&self) -> CalResult<Vec<Meeting>> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.send(StoreCommand::FindAll(response_tx)).await?;
        response_rx
            .recv()
            .await
            .ok_or_else(|| storage_error("Storage actor dropped the response channel"))?
    }

    async fn find(&self, id: MeetingId) -> CalResult<Option<Meeting>> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.send(StoreCommand::Find(id, response_tx)).await?;
        response_rx
            .recv()
            .await
            .ok_or_else(|| storage_error("Storage actor dropped the response channel"))?
    }

    async fn insert(&self, meeting: Meeting) -> CalResult<Meeting> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.send(StoreCommand::Insert(meeting, response_tx)).await?;
        response_rx
            .recv()
            .await
            .ok_or_else(|| storage_error("Storage actor dropped the response channel"))?
    }

    async fn update(&self, id: MeetingId, meeting: Meeting) -> CalResult<()> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.send(StoreCommand::Update(id, meeting, response_tx))
            .await?;
        response_rx
            .recv()
            .await
            .ok_or_else(|| storage_error("Storage actor dropped the response channel"))?
    }

    async fn remove(&self, id: MeetingId) -> CalResult<()> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.send(StoreCommand::Remove(id, response_tx)).await?;
        response_rx
            .recv()
            .await
            .ok_or_else(|| storage_error("Storage actor dropped the response channel"))?
    }

    async fn count(&self) -> CalResult<usize> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.send(StoreCommand::Count(response_tx)).await?;
        response_rx
            .recv()
            .await
            .ok_or_else(|| storage_error("Storage actor dropped the response channel"))?
    }

    async fn shutdown(&self) -> CalResult<()> {
        // The actor may already be gone; that is fine on the way out
        let _ = self.command_tx.send(StoreCommand::Shutdown).await;
        Ok(())
    }
}
