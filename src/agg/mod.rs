pub(crate) mod avg;
pub(crate) mod group;
pub(crate) mod max;
pub(crate) mod stream;

use crate::{Error, GroupBy, Sample, Value};
use group::GroupedAggregation;

/// Number of bytes in one gibibyte (2^30).
pub const BYTES_PER_GIB: Value = 1_073_741_824.0;

/// Usage summary of one calendar period.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct UsageRow {
    /// Period key, `YYYY-MM-DD` or `YYYY-MM`
    pub period: String,

    /// Mean of all samples in the period, in bytes
    pub avg_bytes: Value,

    /// Largest sample in the period, in bytes
    pub max_bytes: Value,

    /// `avg_bytes` in GiB
    pub avg_gib: Value,

    /// `max_bytes` in GiB
    pub max_gib: Value,
}

impl UsageRow {
    pub(crate) fn new(period: String, avg_bytes: Value, max_bytes: Value) -> Self {
        Self {
            period,
            avg_bytes,
            max_bytes,
            avg_gib: avg_bytes / BYTES_PER_GIB,
            max_gib: max_bytes / BYTES_PER_GIB,
        }
    }
}

/// Aggregates samples into per-period usage rows, ordered by period.
///
/// ```
/// use poolusage::{aggregate, GroupBy, Sample};
///
/// let samples = [
///     Sample::new(1_759_278_600.0, 100.0), // 2025-10-01T00:30:00Z
///     Sample::new(1_759_320_000.0, 300.0), // 2025-10-01T12:00:00Z
///     Sample::new(1_759_363_200.0, 500.0), // 2025-10-02T00:00:00Z
/// ];
///
/// let rows = aggregate(&samples, GroupBy::Month)?;
/// assert_eq!(1, rows.len());
/// assert_eq!("2025-10", rows[0].period);
/// assert_eq!(300.0, rows[0].avg_bytes);
/// assert_eq!(500.0, rows[0].max_bytes);
/// #
/// # Ok::<(), poolusage::Error>(())
/// ```
///
/// # Errors
///
/// Returns [`Error::EmptyInput`] if there are no samples,
/// or an error if a timestamp cannot be represented as a date.
pub fn aggregate(samples: &[Sample], group_by: GroupBy) -> crate::Result<Vec<UsageRow>> {
    if samples.is_empty() {
        return Err(Error::EmptyInput);
    }

    Ok(GroupedAggregation::from_samples(samples, group_by)?.collect())
}

#[cfg(test)]
#[allow(clippy::indexing_slicing, clippy::float_cmp)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use std::collections::HashMap;

    fn scenario() -> Vec<Sample> {
        vec![
            Sample::new(1_759_278_600.0, 100.0), // 2025-10-01T00:30:00Z
            Sample::new(1_759_320_000.0, 300.0), // 2025-10-01T12:00:00Z
            Sample::new(1_759_363_200.0, 500.0), // 2025-10-02T00:00:00Z
        ]
    }

    fn approx(a: Value, b: Value) -> bool {
        (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
    }

    #[test_log::test]
    fn scenario_by_day() -> crate::Result<()> {
        let rows = aggregate(&scenario(), GroupBy::Day)?;

        assert_eq!(2, rows.len());

        assert_eq!("2025-10-01", rows[0].period);
        assert_eq!(200.0, rows[0].avg_bytes);
        assert_eq!(300.0, rows[0].max_bytes);

        assert_eq!("2025-10-02", rows[1].period);
        assert_eq!(500.0, rows[1].avg_bytes);
        assert_eq!(500.0, rows[1].max_bytes);

        Ok(())
    }

    #[test_log::test]
    fn scenario_by_month() -> crate::Result<()> {
        let rows = aggregate(&scenario(), GroupBy::Month)?;

        assert_eq!(1, rows.len());
        assert_eq!("2025-10", rows[0].period);
        assert_eq!(300.0, rows[0].avg_bytes);
        assert_eq!(500.0, rows[0].max_bytes);

        Ok(())
    }

    #[test_log::test]
    fn empty_input() {
        for group_by in [GroupBy::Day, GroupBy::Month] {
            assert!(matches!(aggregate(&[], group_by), Err(Error::EmptyInput)));
        }
    }

    #[test_log::test]
    fn gib_is_binary() -> crate::Result<()> {
        let rows = aggregate(&[Sample::new(0.0, 5.0 * BYTES_PER_GIB)], GroupBy::Day)?;

        assert_eq!(5.0, rows[0].avg_gib);
        assert_eq!(5.0, rows[0].max_gib);
        assert_eq!(1_073_741_824.0, BYTES_PER_GIB);

        Ok(())
    }

    #[test_log::test]
    fn zero_usage_is_not_empty() -> crate::Result<()> {
        let rows = aggregate(&[Sample::new(0.0, 0.0)], GroupBy::Day)?;

        assert_eq!(1, rows.len());
        assert_eq!(0.0, rows[0].max_bytes);

        Ok(())
    }

    #[test_log::test]
    fn random_series_invariants() -> crate::Result<()> {
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);

        for _ in 0..50 {
            let len = rng.gen_range(1..500);

            // Irregular timestamps across roughly three months
            let samples = (0..len)
                .map(|_| {
                    Sample::new(
                        f64::from(rng.gen_range(1_759_276_800_u32..1_767_225_600)),
                        rng.gen_range(0.0..1e13),
                    )
                })
                .collect::<Vec<_>>();

            for group_by in [GroupBy::Day, GroupBy::Month] {
                let mut expected: HashMap<String, Vec<Value>> = HashMap::new();
                for sample in &samples {
                    expected
                        .entry(group_by.bucket_key(sample.ts)?)
                        .or_default()
                        .push(sample.value);
                }

                let rows = aggregate(&samples, group_by)?;
                assert_eq!(expected.len(), rows.len());

                for pair in rows.windows(2) {
                    assert!(pair[0].period < pair[1].period);
                }

                for row in &rows {
                    let values = &expected[&row.period];
                    let min = values.iter().copied().fold(Value::INFINITY, Value::min);
                    let max = values.iter().copied().fold(Value::NEG_INFINITY, Value::max);

                    assert_eq!(max, row.max_bytes);
                    assert!(row.avg_bytes >= min * (1.0 - 1e-12));
                    assert!(row.avg_bytes <= max * (1.0 + 1e-12));
                    assert!(approx(row.avg_gib, row.avg_bytes / 1_073_741_824.0));
                    assert!(approx(row.max_gib, row.max_bytes / 1_073_741_824.0));
                }
            }
        }

        Ok(())
    }
}
