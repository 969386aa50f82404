//! Provider timestamp parsing.
//!
//! Linode reports times as `2021-01-02T03:04:05` (implicitly UTC). Some
//! fields carry a numeric offset instead: `2021-01-02T03:04:05-0700`. Either
//! form may carry fractional seconds, e.g. `2021-01-02T03:04:05.123`.

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::warn;

const NAIVE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
const OFFSET_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%z";

/// Parse a provider timestamp, normalized to UTC.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, NAIVE_FORMAT) {
        return Ok(naive.and_utc());
    }
    DateTime::parse_from_str(value, OFFSET_FORMAT).map(|dt| dt.with_timezone(&Utc))
}

/// Parse a provider timestamp, substituting the Unix epoch when it is unreadable.
pub fn parse_timestamp_or_epoch(value: &str) -> DateTime<Utc> {
    parse_timestamp(value).unwrap_or_else(|e| {
        warn!(value, cause = %e, "Unparseable timestamp, using the Unix epoch");
        DateTime::<Utc>::UNIX_EPOCH
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn naive_timestamp_is_utc() {
        assert_eq!(
            parse_timestamp("2021-01-02T03:04:05").unwrap(),
            Utc.with_ymd_and_hms(2021, 1, 2, 3, 4, 5).unwrap()
        );
    }

    #[test]
    fn offset_timestamp_is_normalized() {
        assert_eq!(
            parse_timestamp("2021-01-02T03:04:05-0700").unwrap(),
            Utc.with_ymd_and_hms(2021, 1, 2, 10, 4, 5).unwrap()
        );
    }

    #[test]
    fn fractional_seconds_are_kept() {
        let parsed = parse_timestamp("2021-01-02T03:04:05.123").unwrap();
        assert_eq!(parsed.timestamp(), 1_609_556_645);
        assert_eq!(parsed.timestamp_subsec_millis(), 123);
    }

    #[test]
    fn fractional_seconds_with_offset_are_normalized() {
        let parsed = parse_timestamp("2021-01-02T03:04:05.5-0700").unwrap();
        assert_eq!(
            parsed,
            Utc.with_ymd_and_hms(2021, 1, 2, 10, 4, 5).unwrap()
                + chrono::Duration::milliseconds(500)
        );
    }

    #[test]
    fn garbage_is_rejected_by_strict_parser() {
        assert!(parse_timestamp("not-a-date").is_err());
        assert!(parse_timestamp("").is_err());
    }

    #[test]
    fn garbage_falls_back_to_epoch() {
        assert_eq!(parse_timestamp_or_epoch("not-a-date").timestamp(), 0);
        assert_eq!(
            parse_timestamp_or_epoch("2021-01-02T03:04:05").timestamp(),
            Utc.with_ymd_and_hms(2021, 1, 2, 3, 4, 5)
                .unwrap()
                .timestamp()
        );
        assert_eq!(
            parse_timestamp_or_epoch("2021-01-02T03:04:05.123").timestamp(),
            1_609_556_645
        );
    }
}
