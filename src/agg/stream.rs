use super::{avg::Avg, max::Max};
use crate::Value;

/// Defines an aggregation.
///
/// - `init` seeds the accumulator with the first value (default: Identity)
///
/// - `transform` defines what to do with each value (default: Add)
///
/// - `finish` can transform the result value (default: Identity)
pub trait Aggregation {
    fn init(value: Value) -> Value {
        value
    }

    fn transform(accu: Value, x: Value) -> Value {
        accu + x
    }

    fn finish(accu: Value, _len: usize) -> Value {
        accu
    }
}

/// Running state of one calendar period
///
/// A bucket only exists once a value was pushed into it, so `len` is never 0.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bucket {
    pub len: usize,
    sum: Value,
    max: Value,
}

impl Bucket {
    pub fn new(value: Value) -> Self {
        Self {
            len: 1,
            sum: Avg::init(value),
            max: Max::init(value),
        }
    }

    pub fn push(&mut self, value: Value) {
        self.len += 1;
        self.sum = Avg::transform(self.sum, value);
        self.max = Max::transform(self.max, value);
    }

    pub fn avg(&self) -> Value {
        Avg::finish(self.sum, self.len)
    }

    pub fn max(&self) -> Value {
        Max::finish(self.max, self.len)
    }
}
