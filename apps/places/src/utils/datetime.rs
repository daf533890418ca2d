use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use serde::{Serialize, Serializer};
use std::fmt;

const MILLIS_PER_DAY: u64 = 86_400_000;

/// Parse a photo capture time. Accepts RFC 3339 and the naive layouts cameras
/// and upload clients emit; naive values are taken as UTC.
pub fn parse_datetime(dt_str: &str) -> Option<DateTime<Utc>> {
    let trimmed = dt_str.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    let formats = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y:%m:%d %H:%M:%S",
    ];

    let clean_str = trimmed.trim_end_matches('Z');
    for fmt in &formats {
        if let Ok(naive) = NaiveDateTime::parse_from_str(clean_str, fmt) {
            return Some(DateTime::from_naive_utc_and_offset(naive, Utc));
        }
    }

    NaiveDate::parse_from_str(clean_str, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}

/// Coarse recency bucket for a capture time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeBucket {
    ThisWeek,
    ThisMonth,
    LastThreeMonths,
    ThisYear,
    Year(i32),
}

impl fmt::Display for TimeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeBucket::ThisWeek => write!(f, "This Week"),
            TimeBucket::ThisMonth => write!(f, "This Month"),
            TimeBucket::LastThreeMonths => write!(f, "Last 3 Months"),
            TimeBucket::ThisYear => write!(f, "This Year"),
            TimeBucket::Year(year) => write!(f, "{:04}", year),
        }
    }
}

impl Serialize for TimeBucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Whole days between two instants, rounded up. Direction is ignored.
fn elapsed_days(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    let millis = (now - timestamp).num_milliseconds().unsigned_abs();
    millis.div_ceil(MILLIS_PER_DAY)
}

/// Classify `timestamp` relative to `now`.
pub fn bucket(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> TimeBucket {
    match elapsed_days(timestamp, now) {
        0..=7 => TimeBucket::ThisWeek,
        8..=30 => TimeBucket::ThisMonth,
        31..=90 => TimeBucket::LastThreeMonths,
        91..=365 => TimeBucket::ThisYear,
        _ => TimeBucket::Year(timestamp.year()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn now() -> DateTime<Utc> {
        parse_datetime("2026-10-19T12:00:00Z").unwrap()
    }

    #[test]
    fn test_three_days_is_this_week() {
        assert_eq!(bucket(now() - Duration::days(3), now()), TimeBucket::ThisWeek);
    }

    #[test]
    fn test_forty_days_is_last_three_months() {
        let b = bucket(now() - Duration::days(40), now());
        assert_eq!(b, TimeBucket::LastThreeMonths);
        assert_eq!(b.to_string(), "Last 3 Months");
    }

    #[test]
    fn test_four_hundred_days_is_year() {
        let ts = now() - Duration::days(400);
        let b = bucket(ts, now());
        assert_eq!(b, TimeBucket::Year(2025));
        assert_eq!(b.to_string(), "2025");
    }

    #[test]
    fn test_boundaries_are_inclusive() {
        let n = now();
        assert_eq!(bucket(n - Duration::days(7), n), TimeBucket::ThisWeek);
        assert_eq!(
            bucket(n - Duration::days(7) - Duration::seconds(1), n),
            TimeBucket::ThisMonth
        );
        assert_eq!(bucket(n - Duration::days(30), n), TimeBucket::ThisMonth);
        assert_eq!(bucket(n - Duration::days(90), n), TimeBucket::LastThreeMonths);
        assert_eq!(bucket(n - Duration::days(365), n), TimeBucket::ThisYear);
        assert_eq!(bucket(n - Duration::days(366), n), TimeBucket::Year(2025));
    }

    #[test]
    fn test_future_timestamps_use_absolute_distance() {
        let n = now();
        assert_eq!(bucket(n + Duration::days(2), n), TimeBucket::ThisWeek);
        assert_eq!(bucket(n + Duration::days(500), n), TimeBucket::Year(2028));
    }

    #[test]
    fn test_same_instant_is_this_week() {
        assert_eq!(bucket(now(), now()), TimeBucket::ThisWeek);
    }

    #[test]
    fn test_old_years_are_four_digits() {
        let ts = parse_datetime("0999-06-01").unwrap();
        assert_eq!(bucket(ts, now()).to_string(), "0999");
    }

    #[test]
    fn test_parse_supported_layouts() {
        let expected = parse_datetime("2024-01-15T10:30:00+00:00").unwrap();

        assert_eq!(parse_datetime("2024-01-15T10:30:00Z"), Some(expected));
        assert_eq!(parse_datetime("2024-01-15T10:30:00"), Some(expected));
        assert_eq!(parse_datetime("2024-01-15 10:30:00"), Some(expected));
        assert_eq!(parse_datetime("2024:01:15 10:30:00"), Some(expected));
        assert_eq!(
            parse_datetime("2024-01-15T12:30:00+02:00"),
            Some(expected)
        );
    }

    #[test]
    fn test_parse_date_only() {
        let dt = parse_datetime("2024-01-15").unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-01-15T00:00:00+00:00");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_datetime("yesterday"), None);
        assert_eq!(parse_datetime(""), None);
    }
}
