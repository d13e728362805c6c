use super::{stream::Bucket, UsageRow};
use crate::{GroupBy, Sample};

/// A dictionary of buckets, keyed by calendar period.
///
/// Call `.collect()` to read all buckets into ordered rows.
pub struct GroupedAggregation(pub(crate) crate::HashMap<String, Bucket>);

impl std::ops::Deref for GroupedAggregation {
    type Target = crate::HashMap<String, Bucket>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl GroupedAggregation {
    /// Assigns every sample to its calendar bucket in a single pass.
    pub fn from_samples(samples: &[Sample], group_by: GroupBy) -> crate::Result<Self> {
        let mut map: crate::HashMap<String, Bucket> = crate::HashMap::default();

        for sample in samples {
            let key = group_by.bucket_key(sample.ts)?;

            if let Some(bucket) = map.get_mut(&key) {
                bucket.push(sample.value);
            } else {
                map.insert(key, Bucket::new(sample.value));
            }
        }

        log::trace!(
            "bucketed {} samples into {} periods (group by {group_by})",
            samples.len(),
            map.len(),
        );

        Ok(Self(map))
    }

    /// Consumes all buckets, returning one row per period, sorted by period.
    pub fn collect(self) -> Vec<UsageRow> {
        let mut rows = self
            .0
            .into_iter()
            .map(|(period, bucket)| UsageRow::new(period, bucket.avg(), bucket.max()))
            .collect::<Vec<_>>();

        rows.sort_by(|a, b| a.period.cmp(&b.period));

        rows
    }
}
