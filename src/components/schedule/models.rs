use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Identifier a storage backend assigns to a meeting on insert.
pub type MeetingId = i64;

/// A scheduled meeting with an optional advance notification time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meeting {
    /// Storage-assigned identifier; 0 until the meeting is persisted.
    #[serde(default)]
    pub id: MeetingId,
    pub begin: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notify_at: Option<DateTime<Utc>>,
}

impl Meeting {
    /// Create a meeting that has not been persisted yet
    pub fn new(begin: DateTime<Utc>, end: DateTime<Utc>, notify_at: Option<DateTime<Utc>>) -> Self {
        Self {
            id: 0,
            begin,
            end,
            notify_at,
        }
    }

    /// Create a meeting with a known identifier
    pub fn with_id(
        id: MeetingId,
        begin: DateTime<Utc>,
        end: DateTime<Utc>,
        notify_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            begin,
            end,
            notify_at,
        }
    }

    /// Whether the meeting begins on the given calendar day
    pub fn occurs_on(&self, day: NaiveDate) -> bool {
        self.begin.date_naive() == day
    }
}
