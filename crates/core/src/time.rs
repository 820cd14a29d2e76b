//! Local-time parsing and formatting for dataset timestamps.
//!
//! Both datasets use the same wall-clock format and the same local time
//! reference, so comparison never converts timezones — parsing only. The
//! clean step renders unix epochs in fixed IST (+05:30); there is no DST
//! in this zone, so a fixed offset is sufficient.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};

/// Wall-clock format shared by day keys, sunrise, and event instants,
/// e.g. `2025-06-10 11:45 PM`.
pub const LOCAL_FORMAT: &str = "%Y-%m-%d %I:%M %p";

const IST_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

fn ist() -> FixedOffset {
    FixedOffset::east_opt(IST_OFFSET_SECS).expect("IST offset is in range")
}

/// Parse a day key or event instant in [`LOCAL_FORMAT`].
pub fn parse_local(value: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(value, LOCAL_FORMAT)
}

/// Absolute difference between two instants, in minutes.
pub fn diff_minutes(a: NaiveDateTime, b: NaiveDateTime) -> f64 {
    (b - a).num_seconds().abs() as f64 / 60.0
}

/// Render a unix second as a formatted IST wall-clock string.
///
/// Out-of-range epochs render as the empty string, which the data model
/// treats as "absent".
pub fn format_ist(unix_secs: i64) -> String {
    match DateTime::<Utc>::from_timestamp(unix_secs, 0) {
        Some(dt) => dt.with_timezone(&ist()).format(LOCAL_FORMAT).to_string(),
        None => String::new(),
    }
}

/// Unix second of local (IST) midnight for the given calendar date.
pub fn ist_midnight_epoch(date: NaiveDate) -> i64 {
    let midnight = date.and_hms_opt(0, 0, 0).expect("midnight is a valid time");
    midnight.and_utc().timestamp() - i64::from(IST_OFFSET_SECS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn parse_midnight_and_evening() {
        let midnight = parse_local("2025-06-10 12:00 AM").unwrap();
        assert_eq!(midnight.hour(), 0);
        assert_eq!(midnight.day(), 10);

        let evening = parse_local("2025-06-10 11:45 PM").unwrap();
        assert_eq!(evening.hour(), 23);
        assert_eq!(evening.minute(), 45);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(parse_local("not a timestamp").is_err());
        assert!(parse_local("2025-06-10").is_err());
        assert!(parse_local("").is_err());
    }

    #[test]
    fn diff_is_absolute() {
        let a = parse_local("2025-06-10 10:00 AM").unwrap();
        let b = parse_local("2025-06-10 10:05 AM").unwrap();
        assert_eq!(diff_minutes(a, b), 5.0);
        assert_eq!(diff_minutes(b, a), 5.0);
    }

    #[test]
    fn diff_spans_days() {
        let a = parse_local("2025-06-10 10:00 AM").unwrap();
        let b = parse_local("2025-06-11 10:00 AM").unwrap();
        assert_eq!(diff_minutes(a, b), 24.0 * 60.0);
    }

    #[test]
    fn format_ist_known_epoch() {
        // 2024-12-31 18:30 UTC == 2025-01-01 00:00 IST
        assert_eq!(format_ist(1_735_669_800), "2025-01-01 12:00 AM");
    }

    #[test]
    fn ist_midnight_epoch_round_trips() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let epoch = ist_midnight_epoch(date);
        assert_eq!(epoch, 1_735_669_800);
        assert_eq!(format_ist(epoch), "2025-01-01 12:00 AM");
    }
}
