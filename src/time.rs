use crate::{Error, Timestamp};
use chrono::{DateTime, SecondsFormat, Utc};

/// Converts a timestamp (seconds since epoch) into a UTC date time.
///
/// # Errors
///
/// Returns error if the timestamp is not finite or out of range.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn to_utc(ts: Timestamp) -> crate::Result<DateTime<Utc>> {
    if !ts.is_finite() {
        return Err(Error::InvalidArgument(format!("invalid timestamp: {ts}")));
    }

    let secs = ts.floor();
    let nanos = ((ts - secs) * 1_000_000_000.0) as u32;

    // NOTE: f64 -> i64 saturates, so out of range values are caught below
    DateTime::from_timestamp(secs as i64, nanos.min(999_999_999))
        .ok_or_else(|| Error::InvalidArgument(format!("timestamp out of range: {ts}")))
}

/// Formats a date time the way the query API expects it (`2025-10-01T00:00:00Z`).
#[must_use]
pub fn format_instant(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn epoch() -> crate::Result<()> {
        assert_eq!("1970-01-01T00:00:00Z", format_instant(&to_utc(0.0)?));
        Ok(())
    }

    #[test_log::test]
    fn fractional_seconds() -> crate::Result<()> {
        let dt = to_utc(1_759_278_600.5)?;
        assert_eq!("2025-10-01T00:30:00Z", format_instant(&dt));
        assert_eq!(500_000_000, dt.timestamp_subsec_nanos());
        Ok(())
    }

    #[test_log::test]
    fn not_finite() {
        assert!(matches!(to_utc(f64::NAN), Err(Error::InvalidArgument(_))));
        assert!(matches!(
            to_utc(f64::INFINITY),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test_log::test]
    fn out_of_range() {
        assert!(matches!(to_utc(1e300), Err(Error::InvalidArgument(_))));
    }
}
