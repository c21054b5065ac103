//! Relative timestamp labels ("just now", "5 minutes ago", ...).
//!
//! Labels are computed at render time from absolute timestamps and are never
//! stored on a record.

use chrono::{DateTime, Utc};

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;

/// Format the time elapsed between `created_at` and `now`.
///
/// A `created_at` in the future is clamped to "just now".
pub fn relative_time(now: DateTime<Utc>, created_at: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(created_at).num_seconds();
    if elapsed < 0 {
        log::debug!("Timestamp {} is ahead of {}, clamping", created_at, now);
    }
    format_elapsed(elapsed)
}

/// Format an elapsed number of seconds. Negative input reads as "just now".
pub fn format_elapsed(seconds: i64) -> String {
    if seconds < MINUTE {
        "just now".to_string()
    } else if seconds < HOUR {
        plural(seconds / MINUTE, "minute")
    } else if seconds < DAY {
        plural(seconds / HOUR, "hour")
    } else {
        plural(seconds / DAY, "day")
    }
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", count, unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_boundaries() {
        let cases = [
            (0, "just now"),
            (59, "just now"),
            (60, "1 minute ago"),
            (119, "1 minute ago"),
            (120, "2 minutes ago"),
            (3599, "59 minutes ago"),
            (3600, "1 hour ago"),
            (7200, "2 hours ago"),
            (86399, "23 hours ago"),
            (86400, "1 day ago"),
            (3 * 86400 + 5, "3 days ago"),
        ];
        for (seconds, expected) in cases {
            assert_eq!(format_elapsed(seconds), expected, "elapsed {}s", seconds);
        }
    }

    #[test]
    fn test_relative_to_now() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        assert_eq!(relative_time(now, now - Duration::minutes(10)), "10 minutes ago");
        assert_eq!(relative_time(now, now - Duration::hours(1)), "1 hour ago");
        assert_eq!(relative_time(now, now - Duration::days(2)), "2 days ago");
    }

    #[test]
    fn test_future_clamped() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        assert_eq!(relative_time(now, now + Duration::hours(5)), "just now");
    }
}
