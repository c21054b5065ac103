use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::FeedError;
use super::feed::classify::{AirQualityStatus, Presentation};

/// Layer shown by the map component. The map renders itself; this is the
/// only value it receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapView {
    #[default]
    Traffic,
    Environment,
    Infrastructure,
}

impl MapView {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Traffic => "traffic",
            Self::Environment => "environment",
            Self::Infrastructure => "infrastructure",
        }
    }

    pub fn all() -> &'static [MapView] {
        &[Self::Traffic, Self::Environment, Self::Infrastructure]
    }
}

impl fmt::Display for MapView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MapView {
    type Err = FeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "traffic" => Ok(Self::Traffic),
            "environment" => Ok(Self::Environment),
            "infrastructure" => Ok(Self::Infrastructure),
            other => Err(FeedError::UnknownMapView {
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AirQualityReading {
    pub location: String,
    pub aqi: u32,
}

impl AirQualityReading {
    pub fn status(&self) -> AirQualityStatus {
        AirQualityStatus::from_aqi(self.aqi)
    }

    pub fn card(&self) -> AirQualityCard {
        AirQualityCard {
            location: self.location.clone(),
            aqi: self.aqi,
            status: self.status().presentation(),
        }
    }
}

/// Air quality card as rendered, with its band label and color token.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AirQualityCard {
    pub location: String,
    pub aqi: u32,
    pub status: Presentation,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficCard {
    pub road: String,
    /// Congestion as a percentage of capacity
    pub congestion: u8,
    pub average_speed_kmh: u16,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetCondition {
    Operational,
    Maintenance,
    Offline,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfrastructureStatus {
    pub asset: String,
    pub condition: AssetCondition,
}

/// Static telemetry shown on the dashboard cards.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Telemetry {
    pub traffic: Vec<TrafficCard>,
    pub air_quality: Vec<AirQualityReading>,
    pub infrastructure: Vec<InfrastructureStatus>,
}

impl Telemetry {
    /// Readings worse than "Moderate", for the air quality summary card.
    pub fn unhealthy_readings(&self) -> impl Iterator<Item = &AirQualityReading> {
        self.air_quality.iter().filter(|r| {
            !matches!(r.status(), AirQualityStatus::Good | AirQualityStatus::Moderate)
        })
    }

    pub fn render(&self) -> TelemetryFrame {
        TelemetryFrame {
            traffic: self.traffic.clone(),
            air_quality: self.air_quality.iter().map(AirQualityReading::card).collect(),
            unhealthy_air_quality: self.unhealthy_readings().count(),
            infrastructure: self.infrastructure.clone(),
        }
    }
}

/// Telemetry cards as sent to the frontend.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryFrame {
    pub traffic: Vec<TrafficCard>,
    pub air_quality: Vec<AirQualityCard>,
    /// Readings worse than "Moderate"
    pub unhealthy_air_quality: usize,
    pub infrastructure: Vec<InfrastructureStatus>,
}
