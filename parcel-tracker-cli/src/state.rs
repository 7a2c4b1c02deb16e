//! Persisted user preferences
//!
//! The theme and the notification permission live in the same key-value
//! store as the tracking state, under global keys.

use parcel_tracker::store::{NOTIFICATIONS_KEY, THEME_KEY};
use parcel_tracker::{KeyValueStore, Result};
use std::fmt;

/// Color theme of the terminal report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored theme; anything but "dark" reads as light
pub fn load_theme<S: KeyValueStore + ?Sized>(store: &S) -> Theme {
    match store.get(THEME_KEY).as_deref() {
        Some("dark") => Theme::Dark,
        _ => Theme::Light,
    }
}

/// Flip the stored theme and return the new one
pub fn toggle_theme<S: KeyValueStore + ?Sized>(store: &mut S) -> Result<Theme> {
    let theme = load_theme(&*store).toggled();
    store.set(THEME_KEY, theme.as_str())?;
    Ok(theme)
}

/// Decision about system notifications
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Permission {
    /// Never asked
    #[default]
    Default,
    Granted,
    Denied,
}

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::Default => "default",
            Permission::Granted => "granted",
            Permission::Denied => "denied",
        }
    }
}

pub fn load_permission<S: KeyValueStore + ?Sized>(store: &S) -> Permission {
    match store.get(NOTIFICATIONS_KEY).as_deref() {
        Some("granted") => Permission::Granted,
        Some("denied") => Permission::Denied,
        _ => Permission::Default,
    }
}

pub fn save_permission<S: KeyValueStore + ?Sized>(store: &mut S, permission: Permission) -> Result<()> {
    store.set(NOTIFICATIONS_KEY, permission.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use parcel_tracker::MemoryStore;

    #[test]
    fn test_theme_defaults_to_light() {
        let store = MemoryStore::new();
        assert_eq!(load_theme(&store), Theme::Light);
    }

    #[test]
    fn test_toggle_theme_persists() {
        let mut store = MemoryStore::new();
        assert_eq!(toggle_theme(&mut store).unwrap(), Theme::Dark);
        assert_eq!(store.get("theme").as_deref(), Some("dark"));
        assert_eq!(toggle_theme(&mut store).unwrap(), Theme::Light);
        assert_eq!(load_theme(&store), Theme::Light);
    }

    #[test]
    fn test_permission_round_trip() {
        let mut store = MemoryStore::new();
        assert_eq!(load_permission(&store), Permission::Default);
        save_permission(&mut store, Permission::Denied).unwrap();
        assert_eq!(load_permission(&store), Permission::Denied);
        save_permission(&mut store, Permission::Granted).unwrap();
        assert_eq!(load_permission(&store), Permission::Granted);
    }
}
