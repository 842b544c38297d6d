// src/utils/date.rs

//! Timestamp parsing for feed dates.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

/// Parse a feed date string into a UTC timestamp.
///
/// Accepts RFC 3339, RFC 2822, a naive `YYYY-MM-DDTHH:MM:SS` (read as UTC),
/// and a bare `YYYY-MM-DD` (UTC midnight). Returns `None` otherwise.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Format a timestamp as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
pub fn to_iso_string(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_rfc2822() {
        let dt = parse_timestamp("Mon, 01 Jan 2024 10:30:00 GMT").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 1, 1, 10, 30, 0).unwrap());

        let dt = parse_timestamp("Mon, 01 Jan 2024 10:30:00 +0900").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 1, 1, 1, 30, 0).unwrap());
    }

    #[test]
    fn test_parse_rfc3339() {
        let dt = parse_timestamp("2024-06-01T12:00:00.000Z").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_bare_date() {
        let dt = parse_timestamp("2024-01-01").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("last tuesday").is_none());
        assert!(parse_timestamp("2024-13-45").is_none());
    }

    #[test]
    fn test_to_iso_string() {
        let dt = Utc.with_ymd_and_hms(2024, 1, 1, 10, 30, 0).unwrap();
        assert_eq!(to_iso_string(dt), "2024-01-01T10:30:00.000Z");
    }
}
