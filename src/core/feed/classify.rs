//! Presentation lookups for severities, priorities, categories and AQI scores.
//!
//! Color values are opaque theme tokens; the view layer decides what they
//! look like.

use serde::{Deserialize, Serialize};

use super::record::{Category, Priority, Severity};

/// Color token plus display label for one classified value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Presentation {
    pub color: &'static str,
    pub label: &'static str,
}

pub fn classify_severity(severity: Severity) -> Presentation {
    match severity {
        Severity::High => Presentation {
            color: "danger",
            label: "High",
        },
        Severity::Medium => Presentation {
            color: "warning",
            label: "Medium",
        },
    }
}

pub fn classify_priority(priority: Priority) -> Presentation {
    match priority {
        Priority::High => Presentation {
            color: "danger",
            label: "High Priority",
        },
        Priority::Medium => Presentation {
            color: "warning",
            label: "Medium Priority",
        },
        Priority::Low => Presentation {
            color: "info",
            label: "Low Priority",
        },
    }
}

pub fn classify_category(category: Category) -> Presentation {
    match category {
        Category::Alerts => Presentation {
            color: "danger",
            label: "Alerts",
        },
        Category::Reports => Presentation {
            color: "primary",
            label: "Reports",
        },
        Category::System => Presentation {
            color: "secondary",
            label: "System",
        },
    }
}

/// Icon token shown next to a notification of this category
pub fn category_icon(category: Category) -> &'static str {
    match category {
        Category::Alerts => "alert-triangle",
        Category::Reports => "file-text",
        Category::System => "settings",
    }
}

/// Air quality band for an AQI score. Each band includes its upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AirQualityStatus {
    Good,
    Moderate,
    UnhealthyForSensitiveGroups,
    Unhealthy,
    VeryUnhealthy,
}

impl AirQualityStatus {
    pub fn from_aqi(aqi: u32) -> Self {
        match aqi {
            0..=50 => Self::Good,
            51..=100 => Self::Moderate,
            101..=150 => Self::UnhealthyForSensitiveGroups,
            151..=200 => Self::Unhealthy,
            _ => Self::VeryUnhealthy,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Moderate => "Moderate",
            Self::UnhealthyForSensitiveGroups => "Unhealthy for Sensitive Groups",
            Self::Unhealthy => "Unhealthy",
            Self::VeryUnhealthy => "Very Unhealthy",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Self::Good => "success",
            Self::Moderate => "warning",
            Self::UnhealthyForSensitiveGroups => "orange",
            Self::Unhealthy => "danger",
            Self::VeryUnhealthy => "purple",
        }
    }

    pub fn presentation(&self) -> Presentation {
        Presentation {
            color: self.color(),
            label: self.label(),
        }
    }
}
