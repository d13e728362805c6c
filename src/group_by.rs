use crate::{time::to_utc, Error, Timestamp};
use chrono::Datelike;
use std::str::FromStr;

/// Calendar period that samples are grouped into.
///
/// Periods are always UTC calendar days or months,
/// independent of the host's local time zone.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum GroupBy {
    /// One bucket per UTC calendar day (`YYYY-MM-DD`)
    #[default]
    Day,

    /// One bucket per UTC calendar month (`YYYY-MM`)
    Month,
}

impl GroupBy {
    /// Returns the bucket key of a timestamp (seconds since epoch).
    ///
    /// Keys are zero-padded, so sorting them as strings sorts them chronologically.
    ///
    /// # Errors
    ///
    /// Returns error if the timestamp cannot be represented as a date.
    pub fn bucket_key(self, ts: Timestamp) -> crate::Result<String> {
        let dt = to_utc(ts)?;

        Ok(match self {
            Self::Day => dt.date_naive().format("%Y-%m-%d").to_string(),
            Self::Month => format!("{:04}-{:02}", dt.year(), dt.month()),
        })
    }
}

impl std::fmt::Display for GroupBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Day => write!(f, "day"),
            Self::Month => write!(f, "month"),
        }
    }
}

impl FromStr for GroupBy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(Self::Day),
            "month" => Ok(Self::Month),
            _ => Err(Error::InvalidArgument(format!(
                "group_by must be 'day' or 'month', got {s:?}"
            ))),
        }
    }
}

/// Returns the bucket key of a timestamp for a grouping mode given by name.
///
/// # Errors
///
/// Returns error if the mode is neither `day` nor `month`,
/// or if the timestamp cannot be represented as a date.
pub fn bucket_key(ts: Timestamp, mode: &str) -> crate::Result<String> {
    mode.parse::<GroupBy>()?.bucket_key(ts)
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2025-10-01T00:30:00Z
    const T0: Timestamp = 1_759_278_600.0;

    #[test_log::test]
    fn day_key() -> crate::Result<()> {
        assert_eq!("2025-10-01", GroupBy::Day.bucket_key(T0)?);
        Ok(())
    }

    #[test_log::test]
    fn month_key() -> crate::Result<()> {
        assert_eq!("2025-10", GroupBy::Month.bucket_key(T0)?);
        assert_eq!("1970-01", GroupBy::Month.bucket_key(0.0)?);
        Ok(())
    }

    #[test_log::test]
    fn day_boundary_is_utc_midnight() -> crate::Result<()> {
        // 2025-10-01T23:59:59Z and 2025-10-02T00:00:00Z
        assert_eq!("2025-10-01", GroupBy::Day.bucket_key(1_759_363_199.0)?);
        assert_eq!("2025-10-02", GroupBy::Day.bucket_key(1_759_363_200.0)?);
        Ok(())
    }

    #[test_log::test]
    fn year_boundary() -> crate::Result<()> {
        // 2025-12-31T23:00:00Z and 2026-01-01T00:00:00Z
        assert_eq!("2025-12", GroupBy::Month.bucket_key(1_767_222_000.0)?);
        assert_eq!("2026-01", GroupBy::Month.bucket_key(1_767_225_600.0)?);
        Ok(())
    }

    #[test_log::test]
    fn by_name() -> crate::Result<()> {
        assert_eq!("2025-10-01", bucket_key(T0, "day")?);
        assert_eq!("2025-10", bucket_key(T0, "month")?);
        Ok(())
    }

    #[test_log::test]
    fn unsupported_mode() {
        for mode in ["week", "year", "Day", ""] {
            assert!(matches!(
                bucket_key(T0, mode),
                Err(Error::InvalidArgument(_))
            ));
        }
    }

    #[test_log::test]
    fn display_roundtrip() -> crate::Result<()> {
        for mode in [GroupBy::Day, GroupBy::Month] {
            assert_eq!(mode, mode.to_string().parse()?);
        }
        Ok(())
    }
}
