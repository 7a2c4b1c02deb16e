//! Key-value persistence
//!
//! The tracker persists only scalar strings: the start time of each tracked
//! parcel, the last status seen for it, and a couple of global preferences.
//! Any backend implementing [`KeyValueStore`] can hold them.

pub mod file;
pub mod memory;
pub mod start_time;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use start_time::{StartTimeStore, DEFAULT_MAX_BACKDATE_MINUTES};

use crate::types::Result;

/// Key holding the global theme preference
pub const THEME_KEY: &str = "theme";

/// Key holding the notification permission decision
pub const NOTIFICATIONS_KEY: &str = "notifications";

/// Key holding the start time of a tracking number
pub fn start_time_key(tracking_number: &str) -> String {
    format!("startTime:{}", tracking_number)
}

/// Key holding the last observed status of a tracking number
pub fn last_status_key(tracking_number: &str) -> String {
    format!("lastStatus:{}", tracking_number)
}

/// Synchronous string key-value store
pub trait KeyValueStore {
    /// Read a value, `None` if the key was never set
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value, replacing any previous one
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}
