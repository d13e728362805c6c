use crate::{Timestamp, Value};

/// One observed reading of the usage metric.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Sample {
    /// Seconds since epoch (UTC)
    pub ts: Timestamp,

    /// Bytes used
    pub value: Value,
}

impl Sample {
    /// Creates a sample.
    #[must_use]
    pub const fn new(ts: Timestamp, value: Value) -> Self {
        Self { ts, value }
    }
}

impl From<(Timestamp, Value)> for Sample {
    fn from((ts, value): (Timestamp, Value)) -> Self {
        Self::new(ts, value)
    }
}
