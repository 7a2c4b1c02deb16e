//! Tracker API
//!
//! The [`Tracker`] is the entry point for evaluating a tracking number. It
//! owns the route catalog and the key-value store, and ties the start-time
//! store, the derivation engine, the status notifier and the view projection
//! together into one [`TrackingUpdate`] per evaluation.

use crate::catalog::RouteCatalog;
use crate::config::TrackerConfig;
use crate::engine::derive_state;
use crate::notifier::{StatusNotification, StatusNotifier};
use crate::store::{KeyValueStore, StartTimeStore};
use crate::types::{EpochMillis, Result, Route, StatusKey, TrackerError, TrackingSession};
use crate::view::{project, TrackingView};

/// A status change detected during an evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusTransition {
    pub previous: StatusKey,
    pub current: StatusKey,
    /// Notification to deliver, `None` when notifications are disabled
    pub notification: Option<StatusNotification>,
}

/// Result of evaluating one tracking number at one instant
#[derive(Debug, Clone, PartialEq)]
pub struct TrackingUpdate {
    pub session: TrackingSession,
    pub view: TrackingView,
    pub transition: Option<StatusTransition>,
}

/// Evaluates tracking numbers against a catalog and a persistent store
pub struct Tracker<S: KeyValueStore> {
    catalog: RouteCatalog,
    store: S,
    start_times: StartTimeStore,
    notifier: StatusNotifier,
    notifications: bool,
}

impl<S: KeyValueStore> Tracker<S> {
    /// Create a tracker over `catalog`, persisting into `store`
    pub fn new(catalog: RouteCatalog, store: S, config: &TrackerConfig) -> Self {
        Self {
            catalog,
            store,
            start_times: StartTimeStore::new(config.max_backdate_minutes),
            notifier: StatusNotifier::new(),
            notifications: config.notifications,
        }
    }

    /// Look up the route for a tracking number
    pub fn route(&self, tracking_number: &str) -> Result<&Route> {
        self.catalog
            .get(tracking_number)
            .ok_or_else(|| TrackerError::TrackingNotFound(tracking_number.to_string()))
    }

    /// Pick the tracking number to load at startup: `candidate` when it is
    /// known to the catalog, otherwise `fallback`.
    pub fn resolve_tracking_number<'a>(&self, candidate: Option<&'a str>, fallback: &'a str) -> &'a str {
        match candidate {
            Some(tn) if self.catalog.contains(tn) => tn,
            Some(tn) => {
                log::warn!("Unknown tracking number {:?}, falling back to {}", tn, fallback);
                fallback
            }
            None => fallback,
        }
    }

    /// Derive the current state of `tracking_number` without touching the
    /// last-status record. Creates the start time on first use.
    pub fn session(&mut self, tracking_number: &str, now: EpochMillis) -> Result<TrackingSession> {
        let route = self
            .catalog
            .get(tracking_number)
            .ok_or_else(|| TrackerError::TrackingNotFound(tracking_number.to_string()))?;
        let start_time = self
            .start_times
            .get_or_create(&mut self.store, tracking_number, now)?;
        Ok(derive_state(tracking_number, route, start_time, now))
    }

    /// Evaluate `tracking_number` at `now`: derive its state, record the
    /// observed status, and project the view.
    ///
    /// Unknown tracking numbers fail with [`TrackerError::TrackingNotFound`]
    /// before any state is persisted.
    pub fn evaluate(&mut self, tracking_number: &str, now: EpochMillis) -> Result<TrackingUpdate> {
        let session = self.session(tracking_number, now)?;
        let current = session.current_event();

        let transition = self
            .notifier
            .check_transition(&mut self.store, tracking_number, current.status_key)?
            .map(|previous| StatusTransition {
                previous,
                current: current.status_key,
                notification: self
                    .notifications
                    .then(|| StatusNotification::status_changed(tracking_number, &current.title)),
            });

        let view = project(&session, now);
        Ok(TrackingUpdate {
            session,
            view,
            transition,
        })
    }

    pub fn catalog(&self) -> &RouteCatalog {
        &self.catalog
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}
