//! Parcel Tracker Library
//!
//! Simulated real-time parcel tracking. Given a tracking number, the library
//! derives the parcel's current shipment status from the wall-clock time
//! elapsed since its (persisted) start time, projects an ETA, and keeps the
//! result fresh through a polling driver.
//!
//! # Architecture
//!
//! - [`RouteCatalog`]: static table of tracking numbers and their routes
//! - [`store`]: key-value persistence, start times and last-seen statuses
//! - [`engine`]: pure derivation of the current event and ETA
//! - [`countdown`]: ETA countdown formatting
//! - [`notifier`]: status-change detection
//! - [`view`]: projection into records for the rendering collaborators
//! - [`Tracker`]: ties the above together for one evaluation
//! - [`PollingDriver`]: re-evaluates the active tracking number on a timer
//!
//! The library does NOT render anything or deliver notifications itself;
//! that is left to the application layer (parcel-tracker-cli).
//!
//! # Example Usage
//!
//! ```
//! use parcel_tracker::{MemoryStore, RouteCatalog, Tracker, TrackerConfig};
//!
//! let config = TrackerConfig::new();
//! let mut tracker = Tracker::new(RouteCatalog::demo(), MemoryStore::new(), &config);
//!
//! let now = 1_700_000_000_000;
//! let update = tracker.evaluate("TM123456789", now).unwrap();
//! println!("{}: {}", update.view.status.status_text, update.view.status.countdown);
//!
//! assert!(tracker.evaluate("ZZ000", now).is_err());
//! ```

// Public modules
pub mod catalog;
pub mod clock;
pub mod config;
pub mod countdown;
pub mod driver;
pub mod engine;
pub mod notifier;
pub mod store;
pub mod tracker;
pub mod types;
pub mod view;

// Re-export main types for convenience
pub use catalog::{RouteCatalog, DEFAULT_TRACKING_NUMBER};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::TrackerConfig;
pub use countdown::{format_countdown, Countdown, ARRIVED};
pub use driver::{DriverCommand, DriverOutputs, DriverState, PollingDriver};
pub use engine::derive_state;
pub use notifier::{StatusNotification, StatusNotifier};
pub use store::{FileStore, KeyValueStore, MemoryStore, StartTimeStore};
pub use tracker::{StatusTransition, Tracker, TrackingUpdate};
pub use types::{
    EpochMillis, LatLng, Result, Route, ShipmentEvent, StatusKey, TrackerError,
    TrackingSession,
};
pub use view::{MapView, StatusPill, StatusView, TimelineEntry, TrackingView};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_basics() {
        // Smoke test: the demo catalog backs a working tracker
        let mut tracker = Tracker::new(RouteCatalog::demo(), MemoryStore::new(), &TrackerConfig::new());
        let update = tracker.evaluate(DEFAULT_TRACKING_NUMBER, 1_700_000_000_000).unwrap();
        assert_eq!(update.session.carrier, "MockExpress");
    }
}
