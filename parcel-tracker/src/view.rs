//! View-model projection
//!
//! Turns a [`TrackingSession`] into plain records for the rendering
//! collaborators (status panel, timeline, map). The projection is pure and
//! keeps no UI state; timestamps stay as epoch milliseconds so the renderer
//! picks the display timezone.

use crate::countdown::format_countdown;
use crate::engine::event_timestamp;
use crate::types::{EpochMillis, LatLng, StatusKey, TrackingSession};
use serde::Serialize;
use std::fmt;

/// Badge shown next to a timeline entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StatusPill {
    Delivered,
    OutForDelivery,
    InTransit,
    Info,
}

impl From<StatusKey> for StatusPill {
    fn from(key: StatusKey) -> Self {
        match key {
            StatusKey::Delivered => StatusPill::Delivered,
            StatusKey::OutForDelivery => StatusPill::OutForDelivery,
            StatusKey::InTransit => StatusPill::InTransit,
            StatusKey::Created | StatusKey::Picked | StatusKey::Facility => StatusPill::Info,
        }
    }
}

impl fmt::Display for StatusPill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StatusPill::Delivered => "Delivered",
            StatusPill::OutForDelivery => "Out for delivery",
            StatusPill::InTransit => "In transit",
            StatusPill::Info => "Info",
        };
        f.write_str(label)
    }
}

/// Header panel: current status and ETA
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusView {
    pub tracking_number: String,
    pub carrier: String,
    pub status_text: String,
    pub status_key: StatusKey,
    pub last_update: EpochMillis,
    pub countdown: String,
    pub eta: EpochMillis,
}

/// One row of the timeline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineEntry {
    pub title: String,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Absolute time the event becomes current
    pub timestamp: EpochMillis,
    pub pill: StatusPill,
    pub is_current: bool,
}

/// Bounding box of a route path
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl Bounds {
    /// Smallest box containing every point, `None` for an empty path
    pub fn enclosing(points: &[LatLng]) -> Option<Self> {
        let first = points.first()?;
        let mut bounds = Bounds {
            south_west: *first,
            north_east: *first,
        };
        for p in &points[1..] {
            bounds.south_west.lat = bounds.south_west.lat.min(p.lat);
            bounds.south_west.lng = bounds.south_west.lng.min(p.lng);
            bounds.north_east.lat = bounds.north_east.lat.max(p.lat);
            bounds.north_east.lng = bounds.north_east.lng.max(p.lng);
        }
        Some(bounds)
    }
}

/// Input for the map collaborator: the route path and the parcel's position
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    pub path: Vec<LatLng>,
    pub current_index: usize,
    pub position: LatLng,
    pub bounds: Bounds,
}

/// Everything the renderers need for one update
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackingView {
    pub status: StatusView,
    pub timeline: Vec<TimelineEntry>,
    pub map: MapView,
}

/// Project a session into view records as of `now`
pub fn project(session: &TrackingSession, now: EpochMillis) -> TrackingView {
    let current = session.current_event();

    let status = StatusView {
        tracking_number: session.tracking_number.clone(),
        carrier: session.carrier.clone(),
        status_text: current.title.clone(),
        status_key: current.status_key,
        last_update: now,
        countdown: format_countdown(session.eta, now),
        eta: session.eta,
    };

    let timeline = session
        .events
        .iter()
        .enumerate()
        .map(|(i, event)| TimelineEntry {
            title: event.title.clone(),
            location: event.location.clone(),
            latitude: event.latitude,
            longitude: event.longitude,
            timestamp: event_timestamp(session.start_time, event),
            pill: event.status_key.into(),
            is_current: i == session.current_index,
        })
        .collect();

    let path: Vec<LatLng> = session.events.iter().map(|e| e.lat_lng()).collect();
    let position = path[session.current_index];
    // Sessions always carry at least one event, so the path is non-empty.
    let bounds = Bounds::enclosing(&path).unwrap_or(Bounds {
        south_west: position,
        north_east: position,
    });

    TrackingView {
        status,
        timeline,
        map: MapView {
            path,
            current_index: session.current_index,
            position,
            bounds,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::RouteCatalog;
    use crate::engine::derive_state;
    use crate::types::MILLIS_PER_MINUTE;

    const T: EpochMillis = 1_700_000_000_000;

    fn session_at(minutes: i64) -> TrackingSession {
        let catalog = RouteCatalog::demo();
        let route = catalog.get("TM123456789").unwrap();
        derive_state("TM123456789", route, T, T + minutes * MILLIS_PER_MINUTE)
    }

    #[test]
    fn test_status_panel() {
        let now = T + 250 * MILLIS_PER_MINUTE;
        let view = project(&session_at(250), now);
        assert_eq!(view.status.status_text, "In transit");
        assert_eq!(view.status.carrier, "MockExpress");
        assert_eq!(view.status.last_update, now);
        assert_eq!(view.status.eta, T + 1440 * MILLIS_PER_MINUTE);
        assert_eq!(view.status.countdown, "19h 50m 0s");
    }

    #[test]
    fn test_timeline_entries() {
        let view = project(&session_at(400), T + 400 * MILLIS_PER_MINUTE);
        assert_eq!(view.timeline.len(), 6);

        let current: Vec<_> = view.timeline.iter().filter(|e| e.is_current).collect();
        assert_eq!(current.len(), 1);
        assert_eq!(current[0].title, "Arrived at facility");

        assert_eq!(view.timeline[1].timestamp, T + 60 * MILLIS_PER_MINUTE);
        assert_eq!(view.timeline[0].pill, StatusPill::Info);
        assert_eq!(view.timeline[2].pill, StatusPill::InTransit);
        assert_eq!(view.timeline[4].pill, StatusPill::OutForDelivery);
        assert_eq!(view.timeline[5].pill, StatusPill::Delivered);
    }

    #[test]
    fn test_map_projection() {
        let view = project(&session_at(100), T + 100 * MILLIS_PER_MINUTE);
        assert_eq!(view.map.path.len(), 6);
        assert_eq!(view.map.current_index, 1);
        assert_eq!(view.map.position, LatLng { lat: 34.10, lng: -118.30 });
        assert_eq!(view.map.bounds.south_west, LatLng { lat: 34.0522, lng: -118.30 });
        assert_eq!(view.map.bounds.north_east, LatLng { lat: 39.742, lng: -104.99 });
    }

    #[test]
    fn test_pill_labels() {
        assert_eq!(StatusPill::OutForDelivery.to_string(), "Out for delivery");
        assert_eq!(StatusPill::from(StatusKey::Picked), StatusPill::Info);
    }

    #[test]
    fn test_bounds_of_empty_path() {
        assert_eq!(Bounds::enclosing(&[]), None);
    }
}
