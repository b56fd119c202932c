//! Wall-clock arithmetic at minute precision.
//!
//! Times carry no date. An end time at or before its start time means the
//! block ran past midnight; at most one crossing is assumed.

use chrono::{NaiveTime, Timelike};
use serde::Serializer;

/// Minutes in one day.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Twelve hours. Separates a midnight crossing from a mistyped end time, and a
/// scheduling gap from a day-boundary artifact.
pub const HALF_DAY_MINUTES: u32 = 12 * 60;

/// Rendering of a duration that could not be computed.
pub const NO_DURATION: &str = "-";

/// Parses an `HH:MM` token.
///
/// Returns `None` unless the token is exactly two digits, a colon and two
/// digits describing a real time of day (`00:00` to `23:59`).
pub fn parse_clock(token: &str) -> Option<NaiveTime> {
    let bytes = token.as_bytes();
    let shaped = bytes.len() == 5
        && bytes[2] == b':'
        && bytes[..2].iter().all(u8::is_ascii_digit)
        && bytes[3..].iter().all(u8::is_ascii_digit);
    if !shaped {
        return None;
    }
    NaiveTime::parse_from_str(token, "%H:%M").ok()
}

/// Minutes since midnight.
pub fn minute_of_day(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

/// Duration from `start` to `end`, adding a day when `end` is earlier.
pub fn span_minutes(start: NaiveTime, end: NaiveTime) -> u32 {
    let start = minute_of_day(start);
    let end = minute_of_day(end);
    if end >= start {
        end - start
    } else {
        end + MINUTES_PER_DAY - start
    }
}

/// Formats a clock time as `HH:MM`.
pub fn format_clock(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Serde adapter writing a clock time as `HH:MM`.
pub fn serialize_clock<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_clock(*time))
}

/// Formats minutes as `H:MM` (hours unpadded).
pub fn format_hm(minutes: u32) -> String {
    format!("{}:{:02}", minutes / 60, minutes % 60)
}

/// Formats an optional duration, using [`NO_DURATION`] when absent.
pub fn format_duration(minutes: Option<u32>) -> String {
    minutes.map_or_else(|| NO_DURATION.to_string(), format_hm)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> NaiveTime {
        parse_clock(s).unwrap()
    }

    #[test]
    fn parse_clock_accepts_valid_tokens() {
        assert_eq!(minute_of_day(t("00:00")), 0);
        assert_eq!(minute_of_day(t("08:30")), 510);
        assert_eq!(minute_of_day(t("23:59")), 1439);
    }

    #[test]
    fn parse_clock_rejects_out_of_range() {
        assert!(parse_clock("24:00").is_none());
        assert!(parse_clock("25:00").is_none());
        assert!(parse_clock("12:60").is_none());
    }

    #[test]
    fn parse_clock_rejects_bad_shape() {
        assert!(parse_clock("9:00").is_none());
        assert!(parse_clock("09:0").is_none());
        assert!(parse_clock("0900").is_none());
        assert!(parse_clock("ab:cd").is_none());
    }

    #[test]
    fn span_within_day() {
        assert_eq!(span_minutes(t("08:00"), t("09:00")), 60);
        assert_eq!(span_minutes(t("09:00"), t("09:00")), 0);
    }

    #[test]
    fn span_across_midnight() {
        assert_eq!(span_minutes(t("23:00"), t("01:00")), 120);
        assert_eq!(span_minutes(t("23:30"), t("00:15")), 45);
    }

    #[test]
    fn formats_hours_unpadded() {
        assert_eq!(format_hm(60), "1:00");
        assert_eq!(format_hm(45), "0:45");
        assert_eq!(format_hm(605), "10:05");
        assert_eq!(format_duration(None), "-");
        assert_eq!(format_duration(Some(90)), "1:30");
        assert_eq!(format_clock(t("07:05")), "07:05");
    }
}
