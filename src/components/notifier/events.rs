use crate::components::schedule::models::{Meeting, MeetingId};
use crate::utils::time::{format_datetime, format_time};
use chrono::{DateTime, Utc};

/// What happened to a meeting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// The notification time was reached
    Notified,
    /// The meeting began
    Started,
    /// The meeting ended
    Finished,
}

/// A lifecycle event emitted by the meeting poller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetingEvent {
    pub kind: EventKind,
    pub meeting_id: MeetingId,
    /// The instant the event is about, not the instant it was emitted
    pub at: DateTime<Utc>,
    pub message: String,
}

impl MeetingEvent {
    pub fn notified(meeting: &Meeting, at: DateTime<Utc>) -> Self {
        Self {
            kind: EventKind::Notified,
            meeting_id: meeting.id,
            at,
            message: format!(
                "Meeting #{} begins at {}",
                meeting.id,
                format_datetime(meeting.begin)
            ),
        }
    }

    pub fn started(meeting: &Meeting) -> Self {
        Self {
            kind: EventKind::Started,
            meeting_id: meeting.id,
            at: meeting.begin,
            message: format!(
                "Meeting #{} started at {}",
                meeting.id,
                format_time(meeting.begin)
            ),
        }
    }

    pub fn finished(meeting: &Meeting) -> Self {
        Self {
            kind: EventKind::Finished,
            meeting_id: meeting.id,
            at: meeting.end,
            message: format!(
                "Meeting #{} finished at {}",
                meeting.id,
                format_time(meeting.end)
            ),
        }
    }
}
