//! Notification delivery
//!
//! Status changes are always shown as a toast line on stderr. A terminal bell
//! and a terminal system notification (OSC 9) are added when enabled. Missing
//! support or a denied permission only removes the system notification.

use crate::state::{save_permission, Permission};
use parcel_tracker::{KeyValueStore, StatusNotification, TrackerError};
use std::io::{self, Write};

/// Print a timestamped toast line to stderr
pub fn toast(message: &str) {
    let mut stderr = io::stderr().lock();
    if let Err(e) = write_toast(&mut stderr, message) {
        log::debug!("Toast not shown: {}", e);
    }
}

fn write_toast<W: Write>(out: &mut W, message: &str) -> io::Result<()> {
    writeln!(out, "[{}] {}", chrono::Local::now().format("%H:%M:%S"), message)
}

/// Record the user's answer to the notification permission prompt.
///
/// Fails with `NotificationUnsupported` when the terminal cannot show system
/// notifications, and with `NotificationPermissionDenied` when the user said
/// no. Both leave toast-only delivery in place.
pub fn request_permission<S: KeyValueStore + ?Sized>(
    store: &mut S,
    allow: bool,
    supported: bool,
) -> parcel_tracker::Result<()> {
    if !supported {
        return Err(TrackerError::NotificationUnsupported);
    }
    if allow {
        save_permission(store, Permission::Granted)
    } else {
        save_permission(store, Permission::Denied)?;
        Err(TrackerError::NotificationPermissionDenied)
    }
}

/// Toast text describing the outcome of a permission request
pub fn permission_message(result: &parcel_tracker::Result<()>) -> &'static str {
    match result {
        Ok(()) => "Notifications enabled",
        Err(TrackerError::NotificationUnsupported) => "Notifications not supported",
        Err(_) => "Notifications blocked",
    }
}

/// Delivers status notifications to the terminal
#[derive(Debug, Clone, Copy)]
pub struct TerminalNotifier {
    bell: bool,
    system: bool,
}

impl TerminalNotifier {
    /// System notifications need both a granted permission and a terminal
    pub fn new(bell: bool, permission: Permission, supported: bool) -> Self {
        let system = permission == Permission::Granted && supported;
        if permission == Permission::Granted && !supported {
            log::debug!("Notifications granted but stderr is not a terminal; toast only");
        }
        Self { bell, system }
    }

    pub fn system_enabled(&self) -> bool {
        self.system
    }

    pub fn deliver(&self, notification: &StatusNotification) {
        let mut stderr = io::stderr().lock();
        if let Err(e) = self.deliver_to(&mut stderr, notification) {
            log::warn!("Failed to deliver notification: {}", e);
        }
    }

    fn deliver_to<W: Write>(&self, out: &mut W, notification: &StatusNotification) -> io::Result<()> {
        write_toast(out, &format!("{} - {}", notification.title, notification.body))?;
        if self.bell {
            write!(out, "\x07")?;
        }
        if self.system {
            write!(out, "\x1b]9;{}: {}\x07", notification.title, notification.body)?;
        }
        out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parcel_tracker::MemoryStore;

    fn notification() -> StatusNotification {
        StatusNotification::status_changed("TM123456789", "Delivered")
    }

    #[test]
    fn test_unsupported_terminal() {
        let mut store = MemoryStore::new();
        let result = request_permission(&mut store, true, false);
        assert!(matches!(result, Err(TrackerError::NotificationUnsupported)));
        assert_eq!(permission_message(&result), "Notifications not supported");
        assert!(store.is_empty());
    }

    #[test]
    fn test_denied_is_persisted() {
        let mut store = MemoryStore::new();
        let result = request_permission(&mut store, false, true);
        assert!(matches!(result, Err(TrackerError::NotificationPermissionDenied)));
        assert_eq!(permission_message(&result), "Notifications blocked");
        assert_eq!(store.get("notifications").as_deref(), Some("denied"));
    }

    #[test]
    fn test_granted() {
        let mut store = MemoryStore::new();
        let result = request_permission(&mut store, true, true);
        assert!(result.is_ok());
        assert_eq!(permission_message(&result), "Notifications enabled");
        assert_eq!(store.get("notifications").as_deref(), Some("granted"));
    }

    #[test]
    fn test_toast_only_delivery() {
        let notifier = TerminalNotifier::new(false, Permission::Denied, true);
        assert!(!notifier.system_enabled());

        let mut out = Vec::new();
        notifier.deliver_to(&mut out, &notification()).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with("Status changed - TM123456789: Delivered\n"));
        assert!(!text.contains('\x07'));
    }

    #[test]
    fn test_bell_and_system_notification() {
        let notifier = TerminalNotifier::new(true, Permission::Granted, true);
        assert!(notifier.system_enabled());

        let mut out = Vec::new();
        notifier.deliver_to(&mut out, &notification()).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\x07\x1b]9;Status changed: TM123456789: Delivered\x07"));
    }

    #[test]
    fn test_granted_without_terminal_is_toast_only() {
        let notifier = TerminalNotifier::new(false, Permission::Granted, false);
        assert!(!notifier.system_enabled());
    }
}
