//! Daily and monthly storage pool usage reports from Prometheus.
//!
//! Samples of a single metric (by default `ceph_pool_bytes_used`), scoped to one pool,
//! are fetched from a Prometheus `query_range` endpoint (directly, or proxied through Grafana)
//! and reduced into one row per UTC calendar day or month, holding the average and maximum
//! usage in bytes and in GiB (2^30 bytes).
//!
//! ```no_run
//! use poolusage::{Config, DateRange, GroupBy, PrometheusSource, UsageQuery};
//!
//! let source = PrometheusSource::new(Config::prometheus("http://localhost:9090"))?;
//!
//! // Both dates are inclusive
//! let range = DateRange::inclusive("2025-10-01", "2025-11-30")?;
//!
//! let rows = UsageQuery::new(&source, /* pool ID */ "7", range)
//!     .group_by(GroupBy::Month)
//!     .run()?;
//!
//! for row in rows {
//!     println!("{}: avg={:.2} GiB, max={:.2} GiB", row.period, row.avg_gib, row.max_gib);
//! }
//!
//! # Ok::<(), poolusage::Error>(())
//! ```

#![forbid(unsafe_code)]
#![deny(clippy::all, missing_docs, clippy::cargo)]
#![deny(clippy::unwrap_used)]
#![warn(clippy::indexing_slicing)]
#![warn(clippy::pedantic, clippy::nursery)]
#![warn(clippy::expect_used)]
#![allow(clippy::missing_const_for_fn)]
#![warn(clippy::multiple_crate_versions)]
#![warn(clippy::result_unit_err)]

mod agg;
mod config;
mod date_range;
mod error;
mod group_by;
mod report;
mod sample;
mod selector;
mod source;
mod step;
mod time;
mod usage;

type HashMap<K, V> = std::collections::HashMap<K, V, rustc_hash::FxBuildHasher>;

pub use agg::{aggregate, UsageRow, BYTES_PER_GIB};
pub use config::{Backend, Config, DEFAULT_LABEL, DEFAULT_METRIC, DEFAULT_TIMEOUT};
pub use date_range::{parse_date, DateRange, MAX_POINTS_PER_SERIES};
pub use error::{BackendError, Error, Result};
pub use group_by::{bucket_key, GroupBy};
pub use report::{Format, Report};
pub use sample::Sample;
pub use selector::{LabelName, MetricName, Selector};
pub use source::{PrometheusSource, SampleSource, SeriesPolicy};
pub use step::Step;
pub use time::{format_instant, to_utc};
pub use usage::UsageQuery;

/// Value used in time series (bytes)
pub type Value = f64;

/// Seconds since epoch, as returned by the query API
pub type Timestamp = f64;
