use chrono::{DateTime, Utc};

/// Countdown turns urgent at five minutes.
pub const LOW_TIME_SECONDS: u32 = 300;

#[must_use]
pub fn format_datetime(value: DateTime<Utc>) -> String {
    value.format("%b %-d, %Y").to_string()
}

/// `MM:SS`; minutes keep counting past 59.
#[must_use]
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[must_use]
pub fn is_low_time(seconds: u32) -> bool {
    seconds <= LOW_TIME_SECONDS
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::time::fixed_now;

    #[test]
    fn clock_pads_minutes_and_seconds() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(65), "01:05");
        assert_eq!(format_clock(600), "10:00");
        assert_eq!(format_clock(6_000), "100:00");
    }

    #[test]
    fn low_time_threshold_is_inclusive() {
        assert!(is_low_time(300));
        assert!(!is_low_time(301));
    }

    #[test]
    fn datetime_is_human_readable() {
        assert_eq!(format_datetime(fixed_now()), "Nov 14, 2023");
    }
}
