//! Per-tracking-number start times
//!
//! The start time marks when simulated transit began. It is created lazily on
//! first sight of a tracking number, backdated by a random number of minutes
//! so a freshly tracked parcel already shows some progress, and never changes
//! afterwards.

use super::{start_time_key, KeyValueStore};
use crate::types::{EpochMillis, Result, MILLIS_PER_MINUTE};
use chrono::DateTime;
use rand::Rng;

/// Largest random backdate applied to a new start time
pub const DEFAULT_MAX_BACKDATE_MINUTES: u32 = 239;

/// Creates and reads start times in a [`KeyValueStore`]
#[derive(Debug, Clone, Copy)]
pub struct StartTimeStore {
    max_backdate_minutes: u32,
}

impl Default for StartTimeStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_BACKDATE_MINUTES)
    }
}

impl StartTimeStore {
    pub fn new(max_backdate_minutes: u32) -> Self {
        Self {
            max_backdate_minutes,
        }
    }

    pub fn max_backdate_minutes(&self) -> u32 {
        self.max_backdate_minutes
    }

    /// Read a start time without creating one.
    ///
    /// A stored value that is not an integer, or lies outside the range of
    /// representable dates, is reported as absent.
    pub fn get<S: KeyValueStore + ?Sized>(
        &self,
        store: &S,
        tracking_number: &str,
    ) -> Option<EpochMillis> {
        let raw = store.get(&start_time_key(tracking_number))?;
        match raw.trim().parse::<EpochMillis>() {
            Ok(value) if DateTime::from_timestamp_millis(value).is_some() => Some(value),
            _ => {
                log::warn!(
                    "Ignoring malformed start time for {}: {:?}",
                    tracking_number,
                    raw
                );
                None
            }
        }
    }

    /// Return the stored start time, creating it on first call.
    ///
    /// Idempotent: once a value exists, later calls return it unchanged
    /// whatever `now` is.
    pub fn get_or_create<S: KeyValueStore + ?Sized>(
        &self,
        store: &mut S,
        tracking_number: &str,
        now: EpochMillis,
    ) -> Result<EpochMillis> {
        self.get_or_create_with_rng(store, tracking_number, now, &mut rand::thread_rng())
    }

    /// Same as [`get_or_create`](Self::get_or_create) with an explicit RNG
    pub fn get_or_create_with_rng<S: KeyValueStore + ?Sized, R: Rng>(
        &self,
        store: &mut S,
        tracking_number: &str,
        now: EpochMillis,
        rng: &mut R,
    ) -> Result<EpochMillis> {
        if let Some(existing) = self.get(&*store, tracking_number) {
            return Ok(existing);
        }

        let backdate_minutes = rng.gen_range(0..=self.max_backdate_minutes);
        let start = now - i64::from(backdate_minutes) * MILLIS_PER_MINUTE;
        store.set(&start_time_key(tracking_number), &start.to_string())?;

        log::info!(
            "Started transit for {} ({} min ago)",
            tracking_number,
            backdate_minutes
        );
        Ok(start)
    }
}
