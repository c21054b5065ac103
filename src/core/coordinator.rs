use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::config::Settings;
use super::error::FeedError;
use super::feed::record::{AlertRecord, Category, NotificationRecord, RecordId};
use super::feed::store::SharedStore;
use super::feed::view::{FeedFilter, FeedItem, FeedView};
use super::model::{MapView, Telemetry, TelemetryFrame};
use super::simulator::{interval_from_millis, EventSimulator, PlaybackState};

/// User interactions, one per discrete UI event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DashboardCommand {
    DismissAlert(RecordId),
    MarkRead(RecordId),
    MarkAllRead,
    SetMapView(MapView),
    SetFilter(FeedFilter),
    Pause,
    Resume,
}

impl FromStr for DashboardCommand {
    type Err = FeedError;

    /// Parse a command line such as `dismiss 3`, `read-all` or `filter reports`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || FeedError::InvalidCommand {
            input: s.trim().to_string(),
        };
        let mut parts = s.split_whitespace();
        let verb = parts.next().ok_or_else(invalid)?;
        let arg = parts.next();
        if parts.next().is_some() {
            return Err(invalid());
        }

        let id = |arg: Option<&str>| arg.and_then(|a| a.parse::<RecordId>().ok()).ok_or_else(invalid);

        match (verb, arg) {
            ("dismiss", _) => Ok(Self::DismissAlert(id(arg)?)),
            ("read", _) => Ok(Self::MarkRead(id(arg)?)),
            ("read-all", None) => Ok(Self::MarkAllRead),
            ("map", Some(view)) => Ok(Self::SetMapView(view.parse()?)),
            ("filter", Some(filter)) => {
                let filter = match filter {
                    "all" => FeedFilter::All,
                    "unread" => FeedFilter::Unread,
                    "alerts" => FeedFilter::Category(Category::Alerts),
                    "reports" => FeedFilter::Category(Category::Reports),
                    "system" => FeedFilter::Category(Category::System),
                    _ => return Err(invalid()),
                };
                Ok(Self::SetFilter(filter))
            }
            ("pause", None) => Ok(Self::Pause),
            ("resume", None) => Ok(Self::Resume),
            _ => Err(invalid()),
        }
    }
}

/// Everything the dashboard page shows, as sent to the frontend.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardFrame {
    pub rendered_at: DateTime<Utc>,
    pub map_view: MapView,
    pub telemetry: TelemetryFrame,
    pub alerts: Vec<FeedItem>,
    pub notifications: Vec<FeedItem>,
    pub unread_notifications: usize,
}

pub struct CoordinatorOutput {
    pub frame: Option<DashboardFrame>,
    pub logs: Vec<String>,
}

/// Owns the feed views and routes events into the stores it was handed.
pub struct Coordinator {
    alerts: SharedStore<AlertRecord>,
    notifications: SharedStore<NotificationRecord>,
    alert_feed: FeedView<AlertRecord>,
    notification_feed: FeedView<NotificationRecord>,
    simulator: Option<EventSimulator>,
    map_view: MapView,
    telemetry: Telemetry,
    needs_render: bool,
}

impl Coordinator {
    pub fn new(
        alerts: SharedStore<AlertRecord>,
        notifications: SharedStore<NotificationRecord>,
        telemetry: Telemetry,
        settings: &Settings,
    ) -> Self {
        let alert_feed = FeedView::new(alerts.borrow().subscribe());
        let notification_feed =
            FeedView::new(notifications.borrow().subscribe()).with_filter(settings.notification_filter);
        let simulator = settings.simulation.enabled.then(|| {
            EventSimulator::new(interval_from_millis(settings.simulation.event_interval_ms))
                .with_limit(settings.simulation.max_events)
        });

        Self {
            alerts,
            notifications,
            alert_feed,
            notification_feed,
            simulator,
            map_view: settings.map_view,
            telemetry,
            needs_render: true,
        }
    }

    /// Simulated events emitted so far.
    pub fn events_emitted(&self) -> u64 {
        self.simulator.as_ref().map(|s| s.emitted()).unwrap_or(0)
    }

    /// True once the simulator has emitted its configured event limit.
    pub fn simulation_finished(&self) -> bool {
        self.simulator.as_ref().is_some_and(EventSimulator::is_finished)
    }

    /// Wait until either store publishes a change. Returns false once a
    /// store is gone.
    pub async fn changed(&mut self) -> bool {
        tokio::select! {
            alive = self.alert_feed.changed() => alive,
            alive = self.notification_feed.changed() => alive,
        }
    }

    /// Poll the event source and render a frame if anything changed.
    pub fn tick(&mut self, now: DateTime<Utc>) -> CoordinatorOutput {
        let mut logs = Vec::new();

        // 1. Poll simulated events
        if let Some(simulator) = self.simulator.as_mut() {
            for event in simulator.tick(now) {
                let result = event.apply(
                    &mut self.alerts.borrow_mut(),
                    &mut self.notifications.borrow_mut(),
                    now,
                );
                match result {
                    Ok(id) => logs.push(format!("Simulated event #{} added", id)),
                    Err(e) => logs.push(format!("Simulated event rejected: {}", e)),
                }
            }
        }

        // 2. Render on change
        let changed = self.needs_render || self.alert_feed.has_changed() || self.notification_feed.has_changed();
        let frame = changed.then(|| self.render(now));

        CoordinatorOutput { frame, logs }
    }

    /// Apply one user command. Returns whether it changed anything.
    pub fn handle(&mut self, command: DashboardCommand) -> bool {
        let changed = match command {
            DashboardCommand::DismissAlert(id) => self.alerts.borrow_mut().dismiss(id),
            DashboardCommand::MarkRead(id) => self.notifications.borrow_mut().mark_read(id),
            DashboardCommand::MarkAllRead => self.notifications.borrow_mut().mark_all_read() > 0,
            DashboardCommand::SetMapView(view) => {
                let changed = self.map_view != view;
                self.map_view = view;
                changed
            }
            DashboardCommand::SetFilter(filter) => {
                let changed = self.notification_feed.filter() != filter;
                self.notification_feed.set_filter(filter);
                changed
            }
            DashboardCommand::Pause | DashboardCommand::Resume => {
                let state = if command == DashboardCommand::Pause {
                    PlaybackState::Paused
                } else {
                    PlaybackState::Playing
                };
                match self.simulator.as_mut() {
                    Some(simulator) if simulator.get_state() != state => {
                        simulator.set_state(state);
                        true
                    }
                    _ => false,
                }
            }
        };

        // View-only changes don't go through a store, so force the next render
        if changed {
            self.needs_render = true;
        }
        changed
    }

    /// Render the full dashboard from the latest snapshots.
    pub fn render(&mut self, now: DateTime<Utc>) -> DashboardFrame {
        self.needs_render = false;
        DashboardFrame {
            rendered_at: now,
            map_view: self.map_view,
            telemetry: self.telemetry.render(),
            alerts: self.alert_feed.render(now),
            notifications: self.notification_feed.render(now),
            unread_notifications: self.notification_feed.unread_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SimulationSettings;
    use crate::core::feed::record::{Priority, Severity};
    use crate::core::feed::store::{AlertStore, NotificationStore};
    use crate::core::mock;
    use chrono::{Duration, TimeZone};
    use std::rc::Rc;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn quiet_settings() -> Settings {
        Settings {
            simulation: SimulationSettings {
                enabled: false,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn setup(settings: &Settings) -> (SharedStore<AlertRecord>, SharedStore<NotificationRecord>, Coordinator) {
        let alerts = AlertStore::new().into_shared();
        let notifications = NotificationStore::new().into_shared();
        let coordinator = Coordinator::new(Rc::clone(&alerts), Rc::clone(&notifications), mock::telemetry(), settings);
        (alerts, notifications, coordinator)
    }

    #[test]
    fn test_command_parsing() {
        assert_eq!("dismiss 3".parse::<DashboardCommand>().unwrap(), DashboardCommand::DismissAlert(3));
        assert_eq!(" read-all ".parse::<DashboardCommand>().unwrap(), DashboardCommand::MarkAllRead);
        assert_eq!(
            "map environment".parse::<DashboardCommand>().unwrap(),
            DashboardCommand::SetMapView(MapView::Environment)
        );
        assert_eq!(
            "filter reports".parse::<DashboardCommand>().unwrap(),
            DashboardCommand::SetFilter(FeedFilter::Category(Category::Reports))
        );
        assert!(matches!("dismiss".parse::<DashboardCommand>(), Err(FeedError::InvalidCommand { .. })));
        assert!(matches!("read-all now".parse::<DashboardCommand>(), Err(FeedError::InvalidCommand { .. })));
        assert!(matches!("map moon".parse::<DashboardCommand>(), Err(FeedError::UnknownMapView { .. })));
        assert!("".parse::<DashboardCommand>().is_err());
    }

    #[test]
    fn test_renders_only_on_change() {
        let settings = quiet_settings();
        let (alerts, _notifications, mut coordinator) = setup(&settings);

        assert!(coordinator.tick(t0()).frame.is_some());
        assert!(coordinator.tick(t0()).frame.is_none());

        alerts
            .borrow_mut()
            .add(AlertRecord::new(1, Severity::High, "Gas leak", "Elm St evacuated", t0()))
            .unwrap();
        let frame = coordinator.tick(t0()).frame.unwrap();
        assert_eq!(frame.alerts.len(), 1);
        assert!(coordinator.tick(t0()).frame.is_none());
    }

    #[test]
    fn test_commands_mutate_shared_stores() {
        let settings = quiet_settings();
        let (alerts, notifications, mut coordinator) = setup(&settings);
        mock::seed_alerts(&mut alerts.borrow_mut(), t0()).unwrap();
        mock::seed_notifications(&mut notifications.borrow_mut(), t0()).unwrap();
        coordinator.tick(t0());

        assert!(coordinator.handle(DashboardCommand::DismissAlert(1)));
        assert!(!coordinator.handle(DashboardCommand::DismissAlert(1)));
        assert!(!alerts.borrow().contains(1));

        assert!(coordinator.handle(DashboardCommand::MarkAllRead));
        assert!(!coordinator.handle(DashboardCommand::MarkAllRead));
        assert_eq!(notifications.borrow().unread_count(), 0);

        let frame = coordinator.tick(t0()).frame.unwrap();
        assert_eq!(frame.unread_notifications, 0);
        assert_eq!(frame.alerts.len(), 2);
    }

    #[test]
    fn test_view_changes_force_render() {
        let settings = quiet_settings();
        let (_alerts, notifications, mut coordinator) = setup(&settings);
        notifications
            .borrow_mut()
            .add(NotificationRecord::new(1, "Report", "Graffiti", Category::Reports, Priority::Low, t0()))
            .unwrap();
        coordinator.tick(t0());

        assert!(coordinator.handle(DashboardCommand::SetMapView(MapView::Infrastructure)));
        let frame = coordinator.tick(t0()).frame.unwrap();
        assert_eq!(frame.map_view, MapView::Infrastructure);

        coordinator.handle(DashboardCommand::SetFilter(FeedFilter::Category(Category::System)));
        let frame = coordinator.tick(t0()).frame.unwrap();
        assert!(frame.notifications.is_empty());
        assert_eq!(frame.unread_notifications, 1);
    }

    #[test]
    fn test_frame_carries_air_quality_status() {
        let settings = quiet_settings();
        let (_alerts, _notifications, mut coordinator) = setup(&settings);

        let frame = coordinator.tick(t0()).frame.unwrap();
        let json = serde_json::to_value(&frame).unwrap();
        let downtown = &json["telemetry"]["airQuality"][0];
        assert_eq!(downtown["aqi"], 156);
        assert_eq!(downtown["status"]["label"], "Unhealthy");
        assert_eq!(downtown["status"]["color"], "danger");
        assert_eq!(json["telemetry"]["unhealthyAirQuality"], 2);
    }

    #[test]
    fn test_huge_interval_does_not_panic() {
        let settings: Settings =
            serde_json::from_str(r#"{"simulation":{"enabled":true,"event_interval_ms":18446744073709551615}}"#).unwrap();
        let (alerts, notifications, mut coordinator) = setup(&settings);

        coordinator.tick(t0());
        coordinator.tick(t0() + Duration::hours(1));
        assert_eq!(coordinator.events_emitted(), 0);

        coordinator.tick(t0() + Duration::days(2));
        assert_eq!(coordinator.events_emitted(), 2);
        assert_eq!(alerts.borrow().len() + notifications.borrow().len(), 2);

        // stepping past the representable range stops the simulator quietly
        coordinator.tick(DateTime::<Utc>::MAX_UTC);
        let emitted = coordinator.events_emitted();
        coordinator.tick(DateTime::<Utc>::MAX_UTC);
        assert_eq!(coordinator.events_emitted(), emitted);
    }

    #[test]
    fn test_max_events_not_exceeded() {
        let settings = Settings {
            simulation: SimulationSettings {
                enabled: true,
                event_interval_ms: 10,
                max_events: 3,
            },
            ..Default::default()
        };
        let (alerts, notifications, mut coordinator) = setup(&settings);

        coordinator.tick(t0());
        coordinator.tick(t0() + Duration::seconds(1));
        assert_eq!(coordinator.events_emitted(), 3);
        assert!(coordinator.simulation_finished());
        assert_eq!(alerts.borrow().len() + notifications.borrow().len(), 3);
    }

    #[tokio::test]
    async fn test_changed_wakes_on_command() {
        let settings = quiet_settings();
        let (_alerts, notifications, mut coordinator) = setup(&settings);
        notifications
            .borrow_mut()
            .add(NotificationRecord::new(1, "Report", "Broken bench", Category::Reports, Priority::Low, t0()))
            .unwrap();
        coordinator.render(t0());

        assert!(coordinator.handle(DashboardCommand::MarkRead(1)));
        assert!(coordinator.changed().await);
        let frame = coordinator.render(t0());
        assert_eq!(frame.unread_notifications, 0);
    }

    #[test]
    fn test_simulation_feeds_stores() {
        let settings = Settings {
            seed_mock_data: false,
            simulation: SimulationSettings {
                enabled: true,
                event_interval_ms: 1_000,
                max_events: 0,
            },
            ..Default::default()
        };
        let (alerts, notifications, mut coordinator) = setup(&settings);

        coordinator.tick(t0());
        let output = coordinator.tick(t0() + Duration::seconds(2));
        assert_eq!(output.logs.len(), 2);
        assert_eq!(coordinator.events_emitted(), 2);
        assert_eq!(alerts.borrow().len() + notifications.borrow().len(), 2);
        assert!(output.frame.is_some());

        assert!(coordinator.handle(DashboardCommand::Pause));
        assert!(!coordinator.handle(DashboardCommand::Pause));
        coordinator.tick(t0() + Duration::seconds(10));
        assert_eq!(coordinator.events_emitted(), 2);
    }
}
