use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::feed::view::FeedFilter;
use super::model::MapView;

/// Mock event source settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SimulationSettings {
    pub enabled: bool,
    /// Milliseconds between simulated events
    #[serde(default = "default_event_interval")]
    pub event_interval_ms: u64,
    /// Stop the session after this many simulated events (0 = run forever)
    #[serde(default)]
    pub max_events: u64,
}

fn default_event_interval() -> u64 {
    5_000
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            event_interval_ms: default_event_interval(),
            max_events: 0,
        }
    }
}

/// Dashboard settings, persisted as settings.json.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Settings {
    /// Populate the feeds with mock records on startup
    #[serde(default = "default_true")]
    pub seed_mock_data: bool,
    #[serde(default)]
    pub map_view: MapView,
    #[serde(default)]
    pub notification_filter: FeedFilter,
    #[serde(default)]
    pub simulation: SimulationSettings,
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed_mock_data: true,
            map_view: MapView::default(),
            notification_filter: FeedFilter::default(),
            simulation: SimulationSettings::default(),
        }
    }
}

pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    pub fn new(config_dir: PathBuf) -> Self {
        Self {
            config_path: config_dir.join("settings.json"),
        }
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Load settings, falling back to defaults when the file is missing or unreadable.
    pub fn load(&self) -> Settings {
        if !self.config_path.exists() {
            return Settings::default();
        }

        match fs::read_to_string(&self.config_path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(settings) => settings,
                Err(e) => {
                    log::warn!("Ignoring malformed {:?}: {}", self.config_path, e);
                    Settings::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read {:?}: {}", self.config_path, e);
                Settings::default()
            }
        }
    }

    pub fn save(&self, settings: &Settings) -> io::Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(settings)?;
        fs::write(&self.config_path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::feed::record::Category;
    use tempfile::tempdir;

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::new(dir.path().to_path_buf());

        let default = manager.load();
        assert_eq!(default, Settings::default());
        assert_eq!(default.simulation.event_interval_ms, 5_000);

        let new_settings = Settings {
            seed_mock_data: false,
            map_view: MapView::Environment,
            notification_filter: FeedFilter::Category(Category::Reports),
            simulation: SimulationSettings {
                enabled: true,
                event_interval_ms: 250,
                max_events: 10,
            },
        };

        manager.save(&new_settings).unwrap();
        assert_eq!(manager.load(), new_settings);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::new(dir.path().to_path_buf());
        fs::write(manager.path(), r#"{ "map_view": "infrastructure" }"#).unwrap();

        let loaded = manager.load();
        assert_eq!(loaded.map_view, MapView::Infrastructure);
        assert!(loaded.seed_mock_data);
        assert_eq!(loaded.simulation, SimulationSettings::default());
    }

    #[test]
    fn test_malformed_file_falls_back() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::new(dir.path().to_path_buf());
        fs::write(manager.path(), "{ not json").unwrap();
        assert_eq!(manager.load(), Settings::default());
    }
}
