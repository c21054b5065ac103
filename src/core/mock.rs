//! Static mock data for the dashboard.
//!
//! Timestamps are absolute, derived from the `now` passed in, so feed labels
//! age correctly as the session runs.

use chrono::{DateTime, Duration, Utc};

use super::error::FeedError;
use super::feed::record::{AlertRecord, Category, NotificationRecord, Priority, Severity};
use super::feed::store::{AlertStore, NotificationStore};
use super::model::{AirQualityReading, AssetCondition, InfrastructureStatus, Telemetry, TrafficCard};

/// (severity, title, message, minutes ago), oldest first
const ALERTS: &[(Severity, &str, &str, i64)] = &[
    (Severity::Medium, "Air Quality Advisory", "AQI above 100 in the industrial district", 45),
    (Severity::High, "Traffic Incident", "Multi-vehicle collision on Highway 101 northbound", 12),
    (Severity::High, "Water Main Break", "Service interrupted on Oak Avenue", 3),
];

/// (title, message, category, priority, minutes ago), oldest first
const NOTIFICATIONS: &[(&str, &str, Category, Priority, i64)] = &[
    ("System Maintenance", "Sensor network maintenance scheduled for Sunday 02:00", Category::System, Priority::Low, 2 * 24 * 60),
    ("Report Resolved", "Streetlight outage on 5th Street has been fixed", Category::Reports, Priority::Low, 5 * 60),
    ("New Report Submitted", "Pothole reported near Central Station", Category::Reports, Priority::Medium, 60),
    ("Air Quality Alert", "AQI reached 156 in the downtown area", Category::Alerts, Priority::High, 10),
];

pub fn seed_alerts(store: &mut AlertStore, now: DateTime<Utc>) -> Result<(), FeedError> {
    for (severity, title, message, minutes) in ALERTS {
        let id = store.next_id();
        store.add(AlertRecord::new(id, *severity, *title, *message, now - Duration::minutes(*minutes)))?;
    }
    Ok(())
}

pub fn seed_notifications(store: &mut NotificationStore, now: DateTime<Utc>) -> Result<(), FeedError> {
    for (title, message, category, priority, minutes) in NOTIFICATIONS {
        let id = store.next_id();
        store.add(NotificationRecord::new(
            id,
            *title,
            *message,
            *category,
            *priority,
            now - Duration::minutes(*minutes),
        ))?;
    }
    Ok(())
}

pub fn telemetry() -> Telemetry {
    Telemetry {
        traffic: vec![
            TrafficCard { road: "Highway 101".to_string(), congestion: 78, average_speed_kmh: 32 },
            TrafficCard { road: "Main Street".to_string(), congestion: 45, average_speed_kmh: 41 },
            TrafficCard { road: "Harbor Bridge".to_string(), congestion: 22, average_speed_kmh: 67 },
        ],
        air_quality: vec![
            AirQualityReading { location: "Downtown".to_string(), aqi: 156 },
            AirQualityReading { location: "Industrial District".to_string(), aqi: 104 },
            AirQualityReading { location: "Riverside Park".to_string(), aqi: 38 },
        ],
        infrastructure: vec![
            InfrastructureStatus { asset: "Power Grid".to_string(), condition: AssetCondition::Operational },
            InfrastructureStatus { asset: "Water Supply".to_string(), condition: AssetCondition::Maintenance },
            InfrastructureStatus { asset: "Transit Signals".to_string(), condition: AssetCondition::Operational },
        ],
    }
}
