use chrono::{DateTime, Utc};
use thiserror::Error;

use super::models::{Meeting, MeetingId};

/// Reason a candidate meeting cannot be placed on the schedule.
///
/// Carried inside `Error::Validation` so callers can tell which rule
/// rejected the candidate instead of getting one generic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidMeeting {
    #[error("the meeting must end after it begins")]
    InvertedInterval,

    #[error("the meeting cannot begin in the past")]
    BeginInPast,

    #[error("the notification time must come before the meeting begins")]
    NotifyAfterBegin,

    #[error("the meeting overlaps meeting {with}")]
    Overlaps { with: MeetingId },
}

/// Half-open `[begin, end)` intersection test. Back-to-back meetings
/// (`a.end == b.begin`) do not intersect.
fn intersects(candidate: &Meeting, existing: &Meeting) -> bool {
    candidate.begin < existing.end && existing.begin < candidate.end
}

/// Check a candidate meeting against the scheduling rules.
///
/// `others` is the set the candidate must not collide with. When
/// validating an edit, the caller must pass the set with the edited
/// meeting already excluded, otherwise the candidate would spuriously
/// collide with its own stored version.
///
/// Pure predicate; the first violated rule is reported, in the order
/// interval shape, begin-in-past, notification time, overlap.
pub fn check_meeting(
    candidate: &Meeting,
    others: &[Meeting],
    now: DateTime<Utc>,
) -> Result<(), InvalidMeeting> {
    if candidate.begin >= candidate.end {
        return Err(InvalidMeeting::InvertedInterval);
    }

    if candidate.begin < now {
        return Err(InvalidMeeting::BeginInPast);
    }

    if let Some(notify_at) = candidate.notify_at {
        if notify_at >= candidate.begin {
            return Err(InvalidMeeting::NotifyAfterBegin);
        }
    }

    if let Some(existing) = others.iter().find(|m| intersects(candidate, m)) {
        return Err(InvalidMeeting::Overlaps { with: existing.id });
    }

    Ok(())
}
