//! Tracker configuration types
//!
//! The minimal settings the tracking core needs. Loading them from files and
//! command-line flags is the application's job.

use crate::catalog::DEFAULT_TRACKING_NUMBER;
use crate::store::DEFAULT_MAX_BACKDATE_MINUTES;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the tracker and its polling driver
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Seconds between re-evaluations of the tracked parcel (default: 10)
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// Largest random backdate for a new start time, in minutes (default: 239)
    #[serde(default = "default_max_backdate")]
    pub max_backdate_minutes: u32,

    /// Whether status changes produce notifications
    #[serde(default = "default_true")]
    pub notifications: bool,

    /// Tracking number used when none (or an unknown one) is supplied
    #[serde(default = "default_tracking_number")]
    pub default_tracking_number: String,
}

fn default_true() -> bool {
    true
}

fn default_poll_interval() -> u64 {
    10
}

fn default_max_backdate() -> u32 {
    DEFAULT_MAX_BACKDATE_MINUTES
}

fn default_tracking_number() -> String {
    DEFAULT_TRACKING_NUMBER.to_string()
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval(),
            max_backdate_minutes: default_max_backdate(),
            notifications: default_true(),
            default_tracking_number: default_tracking_number(),
        }
    }
}

impl TrackerConfig {
    /// Create a configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the polling interval in seconds
    pub fn with_poll_interval_secs(mut self, secs: u64) -> Self {
        self.poll_interval_secs = secs;
        self
    }

    /// Builder method: set the largest start-time backdate
    pub fn with_max_backdate_minutes(mut self, minutes: u32) -> Self {
        self.max_backdate_minutes = minutes;
        self
    }

    /// Builder method: enable or disable status notifications
    pub fn with_notifications(mut self, enabled: bool) -> Self {
        self.notifications = enabled;
        self
    }

    /// Builder method: set the fallback tracking number
    pub fn with_default_tracking_number(mut self, tracking_number: impl Into<String>) -> Self {
        self.default_tracking_number = tracking_number.into();
        self
    }

    /// Polling interval as a duration. A zero interval is raised to one second.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }
}
