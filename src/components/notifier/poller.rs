use crate::components::notifier::events::MeetingEvent;
use crate::components::schedule::models::Meeting;
use crate::components::storage::{MeetingStore, SharedStore};
use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Collect the events whose instants fall inside `(last, now]`
///
/// Consecutive polling windows share their boundary, so every instant
/// belongs to exactly one window: `t == last` stays quiet, `t == now`
/// fires. The events come out in meeting order, notification before
/// start before finish within one meeting.
pub fn due_events(
    meetings: &[Meeting],
    last: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Vec<MeetingEvent> {
    let crossed = |t: DateTime<Utc>| t > last && t <= now;

    let mut events = Vec::new();
    for meeting in meetings {
        if let Some(notify_at) = meeting.notify_at {
            if crossed(notify_at) {
                events.push(MeetingEvent::notified(meeting, notify_at));
            }
        }
        if crossed(meeting.begin) {
            events.push(MeetingEvent::started(meeting));
        }
        if crossed(meeting.end) {
            events.push(MeetingEvent::finished(meeting));
        }
    }
    events
}

/// Spawn the polling loop
///
/// Every `period` the loop fetches the meetings and emits the events
/// whose instants were crossed since the previous successful poll. On a
/// fetch failure the window is left open, so those instants fire on the
/// next successful poll instead of being lost. Instants that passed
/// before the loop started never fire.
pub fn start_poller(
    store: SharedStore,
    events_tx: mpsc::Sender<MeetingEvent>,
    period: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Meeting poller started");

        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        let mut last = Utc::now();

        'poll: loop {
            tokio::select! {
                _ = cancel.cancelled() => break 'poll,
                _ = interval.tick() => {}
            }

            let meetings = match store.find_all().await {
                Ok(meetings) => meetings,
                Err(e) => {
                    error!("Failed to fetch meetings: {}", e);
                    continue;
                }
            };

            let now = Utc::now();
            for event in due_events(&meetings, last, now) {
                tokio::select! {
                    _ = cancel.cancelled() => break 'poll,
                    sent = events_tx.send(event) => {
                        if sent.is_err() {
                            warn!("Event sink closed, stopping poller");
                            break 'poll;
                        }
                    }
                }
            }
            last = now;
        }

        info!("Meeting poller stopped");
    })
}
