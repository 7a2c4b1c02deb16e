//! Configuration loading and parsing

use anyhow::{bail, Context, Result};
use parcel_tracker::{Route, RouteCatalog, ShipmentEvent, TrackerConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main application configuration (loaded from config.toml)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub tracker: TrackerConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub routes: Vec<RouteConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

fn default_store_path() -> PathBuf {
    PathBuf::from("parcel-tracker.json")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DisplayConfig {
    /// Ring the terminal bell on status changes
    #[serde(default = "default_true")]
    pub bell: bool,
    /// Use ANSI colors when writing to a terminal
    #[serde(default = "default_true")]
    pub color: bool,
    /// Base URL for shareable tracking links
    #[serde(default = "default_share_base_url")]
    pub share_base_url: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            bell: true,
            color: true,
            share_base_url: default_share_base_url(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_share_base_url() -> String {
    "https://parcels.example.com/track".to_string()
}

/// Extra route declared in the configuration file
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    pub tracking_number: String,
    pub carrier: String,
    pub events: Vec<ShipmentEvent>,
}

impl AppConfig {
    /// Demo catalog extended with the configured routes
    pub fn build_catalog(&self) -> Result<RouteCatalog> {
        let mut catalog = RouteCatalog::demo();
        for entry in &self.routes {
            let route = Route::new(entry.carrier.clone(), entry.events.clone())
                .with_context(|| format!("Invalid route for {}", entry.tracking_number))?;
            if catalog.insert(entry.tracking_number.clone(), route).is_some() {
                log::warn!("Configured route {} replaces a built-in one", entry.tracking_number);
            }
        }
        Ok(catalog)
    }
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    // Fail early on routes the catalog would reject
    let catalog = config.build_catalog()?;
    let default = &config.tracker.default_tracking_number;
    if !catalog.contains(default) {
        bail!(
            "Default tracking number {} is not a known route (known: {})",
            default,
            catalog.tracking_numbers().join(", ")
        );
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use parcel_tracker::StatusKey;

    #[test]
    fn test_config_deserialization() {
        let toml_content = r#"
            [tracker]
            poll_interval_secs = 5

            [store]
            path = "state/tracker.json"

            [[routes]]
            tracking_number = "LC0001"
            carrier = "LocalCourier"

            [[routes.events]]
            title = "Label created"
            offset_minutes = 0
            latitude = 51.5
            longitude = -0.12
            location = "London"
            status_key = "created"

            [[routes.events]]
            title = "Delivered"
            offset_minutes = 45
            latitude = 51.52
            longitude = -0.10
            location = "London"
            status_key = "delivered"
        "#;

        let config: AppConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.tracker.poll_interval_secs, 5);
        assert_eq!(config.tracker.max_backdate_minutes, 239);
        assert_eq!(config.store.path, PathBuf::from("state/tracker.json"));
        assert!(config.display.bell);

        let catalog = config.build_catalog().unwrap();
        assert_eq!(catalog.len(), 4);
        let route = catalog.get("LC0001").unwrap();
        assert_eq!(route.last_event().status_key, StatusKey::Delivered);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.tracker.poll_interval_secs, 10);
        assert_eq!(config.store.path, PathBuf::from("parcel-tracker.json"));
        assert_eq!(config.build_catalog().unwrap().len(), 3);
    }

    #[test]
    fn test_route_without_events_is_rejected() {
        let toml_content = r#"
            [[routes]]
            tracking_number = "EMPTY1"
            carrier = "Nobody"
            events = []
        "#;
        let config: AppConfig = toml::from_str(toml_content).unwrap();
        assert!(config.build_catalog().is_err());
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[display]\nbell = false\n").unwrap();

        let config = load_config(&path).unwrap();
        assert!(!config.display.bell);
        assert!(load_config(&dir.path().join("missing.toml")).is_err());
    }

    #[test]
    fn test_unknown_default_tracking_number_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[tracker]\ndefault_tracking_number = \"ZZ000\"\n").unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().contains("ZZ000"));
    }

    #[test]
    fn test_configured_route_can_be_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let content = r#"
            [tracker]
            default_tracking_number = "LC0002"

            [[routes]]
            tracking_number = "LC0002"
            carrier = "LocalCourier"

            [[routes.events]]
            title = "Label created"
            offset_minutes = 0
            latitude = 51.5
            longitude = -0.12
            location = "London"
            status_key = "created"
        "#;
        fs::write(&path, content).unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.tracker.default_tracking_number, "LC0002");
    }
}
