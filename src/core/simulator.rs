use chrono::{DateTime, Duration, Utc};

use super::error::FeedError;
use super::feed::record::{AlertRecord, Category, NotificationRecord, Priority, RecordId, Severity};
use super::feed::store::{AlertStore, NotificationStore};

/// One scripted event, turned into a record when applied.
#[derive(Debug, Clone, PartialEq)]
pub enum SimulatedEvent {
    Alert {
        severity: Severity,
        title: &'static str,
        message: &'static str,
    },
    Notification {
        title: &'static str,
        message: &'static str,
        category: Category,
        priority: Priority,
    },
}

impl SimulatedEvent {
    /// Add the event to the matching store with a freshly allocated id.
    pub fn apply(
        &self,
        alerts: &mut AlertStore,
        notifications: &mut NotificationStore,
        now: DateTime<Utc>,
    ) -> Result<RecordId, FeedError> {
        match self {
            Self::Alert { severity, title, message } => {
                let id = alerts.next_id();
                alerts.add(AlertRecord::new(id, *severity, *title, *message, now))?;
                Ok(id)
            }
            Self::Notification { title, message, category, priority } => {
                let id = notifications.next_id();
                notifications.add(NotificationRecord::new(id, *title, *message, *category, *priority, now))?;
                Ok(id)
            }
        }
    }
}

fn default_script() -> Vec<SimulatedEvent> {
    vec![
        SimulatedEvent::Alert {
            severity: Severity::Medium,
            title: "Congestion Building",
            message: "Average speed on Main Street dropped below 20 km/h",
        },
        SimulatedEvent::Notification {
            title: "New Report Submitted",
            message: "Illegal dumping reported at Riverside Park",
            category: Category::Reports,
            priority: Priority::Medium,
        },
        SimulatedEvent::Alert {
            severity: Severity::High,
            title: "Power Outage",
            message: "Substation 4 offline, 1,200 households affected",
        },
        SimulatedEvent::Notification {
            title: "Air Quality Alert",
            message: "AQI crossed 150 near the harbor",
            category: Category::Alerts,
            priority: Priority::High,
        },
        SimulatedEvent::Notification {
            title: "Sensor Recalibrated",
            message: "Traffic sensor TS-17 back online",
            category: Category::System,
            priority: Priority::Low,
        },
    ]
}

/// Most events released by one tick; a larger backlog is dropped
const MAX_BURST: u64 = 32;

/// Longest accepted gap between simulated events
const MAX_EVENT_INTERVAL_MS: i64 = 24 * 60 * 60 * 1000;

/// Event interval from a configured millisecond count, clamped to one day.
pub fn interval_from_millis(millis: u64) -> Duration {
    let clamped = i64::try_from(millis)
        .unwrap_or(i64::MAX)
        .min(MAX_EVENT_INTERVAL_MS);
    if clamped as u64 != millis {
        log::warn!("Event interval of {}ms clamped to {}ms", millis, clamped);
    }
    Duration::milliseconds(clamped)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaybackState {
    Playing,
    Paused,
}

/// Mock event source: emits the next scripted event every `interval` of
/// wall-clock time while playing, cycling through the script.
pub struct EventSimulator {
    script: Vec<SimulatedEvent>,
    cursor: usize,
    interval: Duration,
    state: PlaybackState,
    last_tick: Option<DateTime<Utc>>,
    emitted: u64,
    /// Stop after this many events (0 = no limit)
    limit: u64,
}

impl EventSimulator {
    pub fn new(interval: Duration) -> Self {
        Self::with_script(default_script(), interval)
    }

    pub fn with_script(script: Vec<SimulatedEvent>, interval: Duration) -> Self {
        Self {
            script,
            cursor: 0,
            interval,
            state: PlaybackState::Playing,
            last_tick: None,
            emitted: 0,
            limit: 0,
        }
    }

    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }

    /// True once the event limit is reached.
    pub fn is_finished(&self) -> bool {
        self.limit > 0 && self.emitted >= self.limit
    }

    pub fn set_state(&mut self, state: PlaybackState) {
        // Reset the clock so resuming doesn't release a burst of events
        self.last_tick = None;
        self.state = state;
    }

    pub fn get_state(&self) -> PlaybackState {
        self.state
    }

    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    /// Events due since the previous tick. The first tick only starts the clock.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Vec<SimulatedEvent> {
        if self.state == PlaybackState::Paused
            || self.script.is_empty()
            || self.interval <= Duration::zero()
            || self.is_finished()
        {
            self.last_tick = Some(now);
            return Vec::new();
        }

        let last = match self.last_tick {
            Some(last) => last,
            None => {
                self.last_tick = Some(now);
                return Vec::new();
            }
        };

        let budget = match self.limit {
            0 => MAX_BURST,
            limit => (limit - self.emitted).min(MAX_BURST),
        };

        let mut due = Vec::new();
        let mut next = last.checked_add_signed(self.interval);
        while let Some(at) = next.filter(|at| *at <= now) {
            if due.len() as u64 >= budget {
                // Skip the backlog instead of replaying it later
                self.last_tick = Some(now);
                break;
            }
            due.push(self.script[self.cursor].clone());
            self.cursor = (self.cursor + 1) % self.script.len();
            self.last_tick = Some(at);
            next = at.checked_add_signed(self.interval);
        }
        self.emitted += due.len() as u64;
        due
    }
}
