// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting and calendar-day math.

use chrono::{DateTime, FixedOffset, NaiveDate, SecondsFormat, TimeZone, Utc};

/// Largest accepted offset from UTC, in minutes (UTC+14:00 / UTC-14:00).
pub const MAX_UTC_OFFSET_MINUTES: i32 = 14 * 60;

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Fixed-width RFC3339 (millisecond precision, `Z` suffix).
///
/// Stored timestamps use this form so that string ordering in the document
/// store matches chronological ordering.
pub fn format_utc_rfc3339_millis(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Calendar day of `timestamp` as observed in `tz`.
pub fn local_date<Tz: TimeZone>(timestamp: &DateTime<Utc>, tz: &Tz) -> NaiveDate {
    timestamp.with_timezone(tz).date_naive()
}

/// Build a fixed offset from minutes east of UTC.
///
/// Returns `None` outside +/- 14 hours.
pub fn utc_offset_from_minutes(minutes: i32) -> Option<FixedOffset> {
    if !(-MAX_UTC_OFFSET_MINUTES..=MAX_UTC_OFFSET_MINUTES).contains(&minutes) {
        return None;
    }
    FixedOffset::east_opt(minutes * 60)
}

/// Serde adapter storing `DateTime<Utc>` as fixed-width RFC3339.
pub mod rfc3339_millis {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_utc_rfc3339_millis(*date))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_millis_format_is_fixed_width() {
        let whole = Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap();
        let fractional = whole + chrono::Duration::microseconds(1500);

        let a = format_utc_rfc3339_millis(whole);
        let b = format_utc_rfc3339_millis(fractional);

        assert_eq!(a, "2026-03-01T08:00:00.000Z");
        assert_eq!(b, "2026-03-01T08:00:00.001Z");
        assert!(a < b);
    }

    #[test]
    fn test_local_date_crosses_midnight() {
        let ts = Utc.with_ymd_and_hms(2026, 3, 1, 23, 30, 0).unwrap();
        let plus_two = utc_offset_from_minutes(120).unwrap();
        let minus_five = utc_offset_from_minutes(-300).unwrap();

        assert_eq!(
            local_date(&ts, &plus_two),
            NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
        );
        assert_eq!(
            local_date(&ts, &minus_five),
            NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
        );
    }

    #[test]
    fn test_offset_bounds() {
        assert!(utc_offset_from_minutes(840).is_some());
        assert!(utc_offset_from_minutes(-840).is_some());
        assert!(utc_offset_from_minutes(841).is_none());
        assert!(utc_offset_from_minutes(i32::MIN).is_none());
        assert!(utc_offset_from_minutes(i32::MAX).is_none());
    }
}
