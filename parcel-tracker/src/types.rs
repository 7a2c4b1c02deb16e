//! Core types for the parcel tracker library
//!
//! This module defines the shipment data model and the derived tracking
//! session. Routes are immutable once built; sessions are recomputed on every
//! query and never persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Epoch timestamp in milliseconds
pub type EpochMillis = i64;

/// Result type for tracker operations
pub type Result<T> = std::result::Result<T, TrackerError>;

/// Milliseconds in one minute of route offset
pub const MILLIS_PER_MINUTE: i64 = 60_000;

/// Errors that can occur while tracking a parcel
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("Tracking number not found: {0}")]
    TrackingNotFound(String),

    #[error("Notifications are not supported in this environment")]
    NotificationUnsupported,

    #[error("Notification permission denied")]
    NotificationPermissionDenied,

    #[error("Invalid route: {0}")]
    InvalidRoute(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Shipment phase attached to each route event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKey {
    Created,
    Picked,
    InTransit,
    Facility,
    OutForDelivery,
    Delivered,
}

impl StatusKey {
    /// Persisted form of the key (snake_case)
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusKey::Created => "created",
            StatusKey::Picked => "picked",
            StatusKey::InTransit => "in_transit",
            StatusKey::Facility => "facility",
            StatusKey::OutForDelivery => "out_for_delivery",
            StatusKey::Delivered => "delivered",
        }
    }
}

impl fmt::Display for StatusKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusKey {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "created" => Ok(StatusKey::Created),
            "picked" => Ok(StatusKey::Picked),
            "in_transit" => Ok(StatusKey::InTransit),
            "facility" => Ok(StatusKey::Facility),
            "out_for_delivery" => Ok(StatusKey::OutForDelivery),
            "delivered" => Ok(StatusKey::Delivered),
            other => Err(TrackerError::Store(format!("unknown status key: {}", other))),
        }
    }
}

/// A single scheduled event on a shipment route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipmentEvent {
    /// Human readable title (e.g., "Picked up")
    pub title: String,
    /// Minutes after route start at which this event becomes current
    pub offset_minutes: u32,
    pub latitude: f64,
    pub longitude: f64,
    /// Location label (e.g., "Denver, CO")
    pub location: String,
    pub status_key: StatusKey,
}

impl ShipmentEvent {
    pub fn new(
        title: impl Into<String>,
        offset_minutes: u32,
        latitude: f64,
        longitude: f64,
        location: impl Into<String>,
        status_key: StatusKey,
    ) -> Self {
        Self {
            title: title.into(),
            offset_minutes,
            latitude,
            longitude,
            location: location.into(),
            status_key,
        }
    }

    /// Offset converted to milliseconds
    pub fn offset_millis(&self) -> i64 {
        i64::from(self.offset_minutes) * MILLIS_PER_MINUTE
    }

    pub fn lat_lng(&self) -> LatLng {
        LatLng {
            lat: self.latitude,
            lng: self.longitude,
        }
    }
}

/// Raw route shape used for deserialization before validation
#[derive(Debug, Clone, Deserialize)]
struct RouteDef {
    carrier: String,
    events: Vec<ShipmentEvent>,
}

impl TryFrom<RouteDef> for Route {
    type Error = TrackerError;

    fn try_from(def: RouteDef) -> Result<Self> {
        Route::new(def.carrier, def.events)
    }
}

/// A carrier plus its ordered, non-empty list of events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RouteDef")]
pub struct Route {
    carrier: String,
    events: Vec<ShipmentEvent>,
}

impl Route {
    /// Build a route, rejecting an empty event list
    pub fn new(carrier: impl Into<String>, events: Vec<ShipmentEvent>) -> Result<Self> {
        let carrier = carrier.into();
        if events.is_empty() {
            return Err(TrackerError::InvalidRoute(format!(
                "route for carrier {} has no events",
                carrier
            )));
        }
        Ok(Self { carrier, events })
    }

    pub fn carrier(&self) -> &str {
        &self.carrier
    }

    pub fn events(&self) -> &[ShipmentEvent] {
        &self.events
    }

    /// Final event of the route (always present)
    pub fn last_event(&self) -> &ShipmentEvent {
        // Non-empty is guaranteed by `Route::new`
        &self.events[self.events.len() - 1]
    }

    pub fn last_index(&self) -> usize {
        self.events.len() - 1
    }
}

/// Geographic coordinate pair handed to the map collaborator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// Derived tracking state for one query. Recomputed every time; never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackingSession {
    pub tracking_number: String,
    pub carrier: String,
    pub events: Vec<ShipmentEvent>,
    pub start_time: EpochMillis,
    pub current_index: usize,
    pub eta: EpochMillis,
}

impl TrackingSession {
    /// The event the parcel is currently at
    pub fn current_event(&self) -> &ShipmentEvent {
        &self.events[self.current_index]
    }

    pub fn is_delivered(&self) -> bool {
        self.current_event().status_key == StatusKey::Delivered
    }

    /// ETA as a UTC datetime
    pub fn eta_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.eta)
    }
}
