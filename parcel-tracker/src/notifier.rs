//! Status-change detection
//!
//! Compares the freshly derived status of a parcel with the last one persisted
//! for it. The first observation of a tracking number is recorded silently so
//! an initial load never raises a notification.

use crate::store::{last_status_key, KeyValueStore};
use crate::types::{Result, StatusKey};

/// Title of the notification raised on a status change
pub const STATUS_CHANGED_TITLE: &str = "Status changed";

/// A status change ready for the notification collaborator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusNotification {
    pub title: String,
    pub body: String,
}

impl StatusNotification {
    /// Notification for `tracking_number` moving to the event titled `event_title`
    pub fn status_changed(tracking_number: &str, event_title: &str) -> Self {
        Self {
            title: STATUS_CHANGED_TITLE.to_string(),
            body: format!("{}: {}", tracking_number, event_title),
        }
    }
}

/// Last-status bookkeeping on top of a [`KeyValueStore`]
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusNotifier;

impl StatusNotifier {
    pub fn new() -> Self {
        Self
    }

    /// Last persisted status, if any. Unknown stored values read as absent.
    pub fn last_status<S: KeyValueStore + ?Sized>(
        &self,
        store: &S,
        tracking_number: &str,
    ) -> Option<StatusKey> {
        let raw = store.get(&last_status_key(tracking_number))?;
        match raw.parse() {
            Ok(status) => Some(status),
            Err(_) => {
                log::warn!("Ignoring unknown last status for {}: {:?}", tracking_number, raw);
                None
            }
        }
    }

    /// Record `new_status` and report the previous status if it changed.
    ///
    /// Returns `Some(previous)` only when a different status was already
    /// stored. The first observation stores silently and returns `None`.
    pub fn check_transition<S: KeyValueStore + ?Sized>(
        &self,
        store: &mut S,
        tracking_number: &str,
        new_status: StatusKey,
    ) -> Result<Option<StatusKey>> {
        match self.last_status(&*store, tracking_number) {
            Some(previous) if previous == new_status => Ok(None),
            Some(previous) => {
                store.set(&last_status_key(tracking_number), new_status.as_str())?;
                log::info!("{}: status {} -> {}", tracking_number, previous, new_status);
                Ok(Some(previous))
            }
            None => {
                store.set(&last_status_key(tracking_number), new_status.as_str())?;
                log::debug!("{}: first observed status {}", tracking_number, new_status);
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_first_observation_is_silent() {
        let notifier = StatusNotifier::new();
        let mut store = MemoryStore::new();

        let result = notifier
            .check_transition(&mut store, "TM1", StatusKey::InTransit)
            .unwrap();
        assert_eq!(result, None);
        assert_eq!(store.get("lastStatus:TM1").as_deref(), Some("in_transit"));
    }

    #[test]
    fn test_change_is_signalled_and_stored() {
        let notifier = StatusNotifier::new();
        let mut store = MemoryStore::new();
        notifier.check_transition(&mut store, "TM1", StatusKey::Picked).unwrap();

        let result = notifier
            .check_transition(&mut store, "TM1", StatusKey::InTransit)
            .unwrap();
        assert_eq!(result, Some(StatusKey::Picked));
        assert_eq!(notifier.last_status(&store, "TM1"), Some(StatusKey::InTransit));
    }

    #[test]
    fn test_same_status_is_not_signalled() {
        let notifier = StatusNotifier::new();
        let mut store = MemoryStore::new();
        notifier.check_transition(&mut store, "TM1", StatusKey::Facility).unwrap();

        for _ in 0..3 {
            let result = notifier
                .check_transition(&mut store, "TM1", StatusKey::Facility)
                .unwrap();
            assert_eq!(result, None);
        }
    }

    #[test]
    fn test_every_change_signals() {
        let notifier = StatusNotifier::new();
        let mut store = MemoryStore::new();
        notifier.check_transition(&mut store, "TM1", StatusKey::Created).unwrap();

        let sequence = [
            StatusKey::Picked,
            StatusKey::InTransit,
            StatusKey::Facility,
            StatusKey::OutForDelivery,
            StatusKey::Delivered,
        ];
        let mut previous = StatusKey::Created;
        for status in sequence {
            let result = notifier.check_transition(&mut store, "TM1", status).unwrap();
            assert_eq!(result, Some(previous));
            previous = status;
        }
    }

    #[test]
    fn test_tracking_numbers_are_independent() {
        let notifier = StatusNotifier::new();
        let mut store = MemoryStore::new();
        notifier.check_transition(&mut store, "A", StatusKey::Picked).unwrap();

        let result = notifier
            .check_transition(&mut store, "B", StatusKey::Delivered)
            .unwrap();
        assert_eq!(result, None);
    }

    #[test]
    fn test_unknown_stored_value_reads_as_first_observation() {
        let notifier = StatusNotifier::new();
        let mut store = MemoryStore::new();
        store.set("lastStatus:TM1", "teleported").unwrap();

        let result = notifier
            .check_transition(&mut store, "TM1", StatusKey::Picked)
            .unwrap();
        assert_eq!(result, None);
        assert_eq!(store.get("lastStatus:TM1").as_deref(), Some("picked"));
    }

    #[test]
    fn test_notification_text() {
        let n = StatusNotification::status_changed("TM1", "Out for delivery");
        assert_eq!(n.title, "Status changed");
        assert_eq!(n.body, "TM1: Out for delivery");
    }
}
