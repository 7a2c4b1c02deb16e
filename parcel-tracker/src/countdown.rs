//! ETA countdown formatting

use crate::types::EpochMillis;
use std::fmt;

/// Text shown once the ETA has passed
pub const ARRIVED: &str = "Arrived";

/// Positive remaining duration split into calendar-free units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl Countdown {
    /// Break down the time left until `eta`; `None` once it has passed
    pub fn until(eta: EpochMillis, now: EpochMillis) -> Option<Self> {
        let remaining_ms = eta.saturating_sub(now);
        if remaining_ms <= 0 {
            return None;
        }

        let total = remaining_ms / 1000;
        Some(Self {
            days: total / 86_400,
            hours: (total % 86_400) / 3_600,
            minutes: (total % 3_600) / 60,
            seconds: total % 60,
        })
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.days > 0 {
            write!(f, "{}d ", self.days)?;
        }
        if self.hours > 0 || self.days > 0 {
            write!(f, "{}h ", self.hours)?;
        }
        write!(f, "{}m {}s", self.minutes, self.seconds)
    }
}

/// Format the time left until `eta`, or [`ARRIVED`] once it has passed
pub fn format_countdown(eta: EpochMillis, now: EpochMillis) -> String {
    match Countdown::until(eta, now) {
        Some(countdown) => countdown.to_string(),
        None => ARRIVED.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ETA: EpochMillis = 1_700_000_000_000;

    #[test]
    fn test_arrived_when_due_or_past() {
        assert_eq!(format_countdown(ETA, ETA), ARRIVED);
        assert_eq!(format_countdown(ETA, ETA + 1), ARRIVED);
        assert_eq!(format_countdown(ETA, ETA + 86_400_000), ARRIVED);
    }

    #[test]
    fn test_one_minute_left() {
        assert_eq!(format_countdown(ETA, ETA - 60_000), "1m 0s");
    }

    #[test]
    fn test_sub_second_remainder_shows_zero() {
        assert_eq!(format_countdown(ETA, ETA - 999), "0m 0s");
    }

    #[test]
    fn test_hours_without_days() {
        let left = (3 * 3_600 + 4 * 60 + 5) * 1000;
        assert_eq!(format_countdown(ETA, ETA - left), "3h 4m 5s");
    }

    #[test]
    fn test_days_keep_zero_hours() {
        let left = (86_400 + 5) * 1000;
        assert_eq!(format_countdown(ETA, ETA - left), "1d 0h 0m 5s");
    }

    #[test]
    fn test_breakdown() {
        let left = (2 * 86_400 + 23 * 3_600 + 59 * 60 + 59) * 1000 + 500;
        assert_eq!(
            Countdown::until(ETA, ETA - left),
            Some(Countdown {
                days: 2,
                hours: 23,
                minutes: 59,
                seconds: 59
            })
        );
        assert_eq!(Countdown::until(ETA, ETA), None);
    }

    #[test]
    fn test_extreme_inputs_do_not_overflow() {
        assert_eq!(format_countdown(i64::MIN, i64::MAX), ARRIVED);
        assert!(Countdown::until(i64::MAX, i64::MIN).is_some());
    }
}
