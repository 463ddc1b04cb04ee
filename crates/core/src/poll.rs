//! Poll timer: the safety net against missed push notifications.
//!
//! The event loop arms a single one-shot timer; when the tick comes back
//! it is re-armed only if the session accepted it. Each tick carries the
//! generation it was scheduled under, so a timer that outlives a reconnect
//! or an edit transition goes stale instead of racing the fresh chain.

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;

use crate::inspector::Event;

/// Fixed cadence for the safety-net refresh.
pub const POLL_INTERVAL: Duration = Duration::from_millis(200);

pub struct Poller {
    events: UnboundedSender<Event>,
    interval: Duration,
}

impl Poller {
    pub fn new(events: UnboundedSender<Event>) -> Self {
        Self::with_interval(events, POLL_INTERVAL)
    }

    /// Tests shrink the cadence with this.
    pub fn with_interval(events: UnboundedSender<Event>, interval: Duration) -> Self {
        Self { events, interval }
    }

    /// Schedule one tick. The event loop only re-arms after consuming the
    /// previous tick, so at most one timer is outstanding per session.
    pub fn arm(&self, generation: u64) {
        let events = self.events.clone();
        let interval = self.interval;
        tokio::spawn(async move {
            tokio::time::sleep(interval).await;
            // The loop may have shut down; a dead receiver is fine.
            let _ = events.send(Event::Tick { generation });
        });
    }
}
