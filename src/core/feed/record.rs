// Feed record types for alerts and notifications.
//
// NOTE: TypeScript mirror types live with the dashboard frontend.
// Keep both in sync when modifying data structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Record identifier, unique within one store instance
pub type RecordId = u64;

/// Alert severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
}

impl Severity {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
        }
    }

    pub fn all() -> &'static [Severity] {
        &[Self::High, Self::Medium]
    }
}

/// Notification priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }

    pub fn all() -> &'static [Priority] {
        &[Self::High, Self::Medium, Self::Low]
    }
}

/// Notification category, one tab per variant on the notifications page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Alerts,
    Reports,
    System,
}

impl Category {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Alerts => "Alerts",
            Self::Reports => "Reports",
            Self::System => "System",
        }
    }

    pub fn all() -> &'static [Category] {
        &[Self::Alerts, Self::Reports, Self::System]
    }
}

/// Common view of anything a feed store can hold.
pub trait FeedRecord: Clone {
    fn id(&self) -> RecordId;
    fn title(&self) -> &str;
    fn message(&self) -> &str;
    fn created_at(&self) -> DateTime<Utc>;
}

/// Records that can be destructively removed by the user.
pub trait Dismissible: FeedRecord {}

/// Records carrying a read flag that only ever goes false -> true.
pub trait Readable: FeedRecord {
    fn is_read(&self) -> bool;
    fn mark_read(&mut self);
}

/// A dismissible city alert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertRecord {
    pub id: RecordId,
    pub severity: Severity,
    pub title: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl AlertRecord {
    pub fn new(
        id: RecordId,
        severity: Severity,
        title: impl Into<String>,
        message: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            severity,
            title: title.into(),
            message: message.into(),
            created_at,
        }
    }
}

impl FeedRecord for AlertRecord {
    fn id(&self) -> RecordId {
        self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn message(&self) -> &str {
        &self.message
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Dismissible for AlertRecord {}

/// A notification entry. Never removed, only marked read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRecord {
    pub id: RecordId,
    pub title: String,
    pub message: String,
    pub category: Category,
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
    is_read: bool,
}

impl NotificationRecord {
    /// Create an unread notification.
    pub fn new(
        id: RecordId,
        title: impl Into<String>,
        message: impl Into<String>,
        category: Category,
        priority: Priority,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            message: message.into(),
            category,
            priority,
            created_at,
            is_read: false,
        }
    }
}

impl FeedRecord for NotificationRecord {
    fn id(&self) -> RecordId {
        self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn message(&self) -> &str {
        &self.message
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Readable for NotificationRecord {
    fn is_read(&self) -> bool {
        self.is_read
    }

    fn mark_read(&mut self) {
        self.is_read = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_variants_have_names() {
        for severity in Severity::all() {
            assert!(!severity.display_name().is_empty());
        }
        for priority in Priority::all() {
            assert!(!priority.display_name().is_empty());
        }
        for category in Category::all() {
            assert!(!category.display_name().is_empty());
        }
    }

    #[test]
    fn test_new_notification_is_unread() {
        let n = NotificationRecord::new(1, "Report received", "Pothole on 5th", Category::Reports, Priority::Low, Utc::now());
        assert!(!n.is_read());
    }

    #[test]
    fn test_mark_read_is_sticky() {
        let mut n = NotificationRecord::new(1, "Maintenance", "Scheduled downtime", Category::System, Priority::Medium, Utc::now());
        n.mark_read();
        n.mark_read();
        assert!(n.is_read());
    }

    #[test]
    fn test_serialized_shape() {
        let n = NotificationRecord::new(7, "t", "m", Category::Alerts, Priority::High, Utc::now());
        let json = serde_json::to_value(&n).unwrap();
        assert_eq!(json["category"], "alerts");
        assert_eq!(json["priority"], "high");
        assert_eq!(json["isRead"], false);
        assert!(json.get("createdAt").is_some());
    }
}
