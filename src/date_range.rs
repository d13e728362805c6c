use crate::{time::format_instant, Error, Step};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

/// Prometheus rejects range queries that would return more points per series.
pub const MAX_POINTS_PER_SERIES: u64 = 11_000;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a `YYYY-MM-DD` calendar date.
///
/// # Errors
///
/// Returns error if the string is not a valid date.
pub fn parse_date(s: &str) -> crate::Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|e| Error::InvalidArgument(format!("invalid date {s:?} (expected YYYY-MM-DD): {e}")))
}

/// Query window, `start` inclusive, `end` exclusive, both UTC midnight.
///
/// ```
/// use poolusage::DateRange;
///
/// // A single day is a full 24 hour window, not an empty one
/// let range = DateRange::inclusive("2025-10-01", "2025-10-01")?;
/// assert_eq!("2025-10-01T00:00:00Z", range.start_param());
/// assert_eq!("2025-10-02T00:00:00Z", range.end_param());
/// #
/// # Ok::<(), poolusage::Error>(())
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DateRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl DateRange {
    /// Creates a window covering the calendar days `from..=to`.
    ///
    /// # Errors
    ///
    /// Returns error if `from` is after `to`, or `to` is the last representable date.
    pub fn from_dates(from: NaiveDate, to: NaiveDate) -> crate::Result<Self> {
        if from > to {
            return Err(Error::InvalidArgument(format!(
                "from date {from} is after to date {to}"
            )));
        }

        let end = to
            .succ_opt()
            .ok_or_else(|| Error::InvalidArgument(format!("to date {to} is out of range")))?;

        Ok(Self {
            start: from.and_time(NaiveTime::MIN).and_utc(),
            end: end.and_time(NaiveTime::MIN).and_utc(),
        })
    }

    /// Parses `from` and `to` (`YYYY-MM-DD`, both inclusive) into a window.
    ///
    /// # Errors
    ///
    /// Returns error if a date is invalid, or `from` is after `to`.
    pub fn inclusive(from: &str, to: &str) -> crate::Result<Self> {
        Self::from_dates(parse_date(from)?, parse_date(to)?)
    }

    /// Start of the window (inclusive).
    #[must_use]
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// End of the window (exclusive).
    #[must_use]
    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// `start` formatted for the query API.
    #[must_use]
    pub fn start_param(&self) -> String {
        format_instant(&self.start)
    }

    /// `end` formatted for the query API.
    #[must_use]
    pub fn end_param(&self) -> String {
        format_instant(&self.end)
    }

    /// Number of steps that fit into the window.
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub fn resolution(&self, step: &Step) -> u64 {
        let millis = (self.end - self.start).num_milliseconds().max(0) as u64;
        millis / step.as_millis()
    }

    /// Checks that a range query with this step stays within the backend's point limit.
    ///
    /// # Errors
    ///
    /// Returns error if the query would exceed [`MAX_POINTS_PER_SERIES`].
    pub fn check_resolution(&self, step: &Step) -> crate::Result<()> {
        let points = self.resolution(step);

        if points > MAX_POINTS_PER_SERIES {
            return Err(Error::InvalidArgument(format!(
                "{points} points per series exceed the limit of {MAX_POINTS_PER_SERIES}, use a larger step than {step}"
            )));
        }

        Ok(())
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.start_param(), self.end_param())
    }
}
