use crate::{aggregate, DateRange, GroupBy, SampleSource, Step, UsageRow};

/// Usage report query of one pool.
///
/// ```
/// use poolusage::{DateRange, GroupBy, Sample, SampleSource, Step, UsageQuery};
///
/// struct Fixed;
///
/// impl SampleSource for Fixed {
///     fn fetch(&self, _: &str, _: &DateRange, _: &Step) -> poolusage::Result<Vec<Sample>> {
///         Ok(vec![
///             Sample::new(1_759_278_600.0, 100.0),
///             Sample::new(1_759_363_200.0, 500.0),
///         ])
///     }
/// }
///
/// let rows = UsageQuery::new(&Fixed, "7", DateRange::inclusive("2025-10-01", "2025-10-02")?)
///     .group_by(GroupBy::Day)
///     .run()?;
///
/// assert_eq!(2, rows.len());
/// #
/// # Ok::<(), poolusage::Error>(())
/// ```
pub struct UsageQuery<'a, S: SampleSource> {
    /// Where samples come from
    source: &'a S,

    /// Pool to report on
    pool_id: &'a str,

    /// Query window
    range: DateRange,

    /// Sampling interval
    step: Step,

    /// Calendar period of each row
    group_by: GroupBy,
}

impl<'a, S: SampleSource> UsageQuery<'a, S> {
    /// Creates a query grouping by day with a 1h step.
    #[must_use]
    pub fn new(source: &'a S, pool_id: &'a str, range: DateRange) -> Self {
        Self {
            source,
            pool_id,
            range,
            step: Step::default(),
            group_by: GroupBy::default(),
        }
    }

    /// Sets the sampling interval.
    #[must_use]
    pub fn step(mut self, step: Step) -> Self {
        self.step = step;
        self
    }

    /// Sets the calendar period of each row.
    #[must_use]
    pub fn group_by(mut self, group_by: GroupBy) -> Self {
        self.group_by = group_by;
        self
    }

    /// Fetches the samples and aggregates them.
    ///
    /// # Errors
    ///
    /// Returns error if the samples could not be fetched,
    /// or [`crate::Error::EmptyInput`] if there were none.
    pub fn run(self) -> crate::Result<Vec<UsageRow>> {
        let samples = self.source.fetch(self.pool_id, &self.range, &self.step)?;

        log::debug!(
            "pool {}: aggregating {} samples by {}",
            self.pool_id,
            samples.len(),
            self.group_by,
        );

        aggregate(&samples, self.group_by)
    }
}
