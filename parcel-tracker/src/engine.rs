//! State derivation engine
//!
//! Maps (route, start time, now) to the current position of a parcel on its
//! route. Everything here is pure computation; unknown tracking numbers are
//! rejected before this module is reached.

use crate::types::{EpochMillis, Route, ShipmentEvent, TrackingSession, MILLIS_PER_MINUTE};

/// Whole minutes elapsed since `start_time`, clamped at zero
pub fn elapsed_minutes(start_time: EpochMillis, now: EpochMillis) -> i64 {
    now.saturating_sub(start_time)
        .div_euclid(MILLIS_PER_MINUTE)
        .max(0)
}

/// Index of the current event: the last event whose offset has been reached.
///
/// Later qualifying events win over earlier ones, so events sharing an offset
/// resolve to the latest of them. Falls back to 0 when nothing qualifies.
pub fn current_index(events: &[ShipmentEvent], elapsed_minutes: i64) -> usize {
    let mut index = 0;
    for (i, event) in events.iter().enumerate() {
        if elapsed_minutes >= i64::from(event.offset_minutes) {
            index = i;
        }
    }
    index
}

/// Absolute time at which `event` becomes current
pub fn event_timestamp(start_time: EpochMillis, event: &ShipmentEvent) -> EpochMillis {
    start_time.saturating_add(event.offset_millis())
}

/// Estimated arrival: the absolute time of the route's final event
pub fn eta(route: &Route, start_time: EpochMillis) -> EpochMillis {
    event_timestamp(start_time, route.last_event())
}

/// Derive the tracking session for `route` at `now`
pub fn derive_state(
    tracking_number: &str,
    route: &Route,
    start_time: EpochMillis,
    now: EpochMillis,
) -> TrackingSession {
    let elapsed = elapsed_minutes(start_time, now);
    let index = current_index(route.events(), elapsed);

    log::debug!(
        "{}: {} min elapsed, event {}/{} ({})",
        tracking_number,
        elapsed,
        index + 1,
        route.events().len(),
        route.events()[index].status_key
    );

    TrackingSession {
        tracking_number: tracking_number.to_string(),
        carrier: route.carrier().to_string(),
        events: route.events().to_vec(),
        start_time,
        current_index: index,
        eta: eta(route, start_time),
    }
}
