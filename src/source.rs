use crate::{
    error::BackendError, Config, DateRange, Error, LabelName, MetricName, Sample, Selector, Step,
    Timestamp, Value,
};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::{collections::BTreeMap, str::FromStr};

/// Supplies the raw samples of a pool.
pub trait SampleSource {
    /// Returns all samples of the pool in `[range.start(), range.end())`, one per `step`.
    ///
    /// An empty vector means that no series matched, which is not an error here.
    ///
    /// # Errors
    ///
    /// Returns error if the samples could not be retrieved.
    fn fetch(&self, pool_id: &str, range: &DateRange, step: &Step) -> crate::Result<Vec<Sample>>;
}

/// What to do if the selector matches more than one series.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum SeriesPolicy {
    /// Fail with [`BackendError::AmbiguousSeries`]
    #[default]
    Single,

    /// Use the first series returned, ignoring all others
    First,
}

impl FromStr for SeriesPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single" => Ok(Self::Single),
            "first" => Ok(Self::First),
            _ => Err(Error::InvalidArgument(format!(
                "series policy must be 'single' or 'first', got {s:?}"
            ))),
        }
    }
}

#[derive(Deserialize)]
struct QueryResponse {
    status: String,

    #[serde(default)]
    data: Option<QueryData>,
}

#[derive(Deserialize)]
struct QueryData {
    #[serde(default)]
    result: Vec<Series>,
}

#[derive(Deserialize)]
struct Series {
    #[serde(default)]
    metric: BTreeMap<String, String>,

    // [ <timestamp>, "<value>" ]
    #[serde(default)]
    values: Vec<(Timestamp, String)>,
}

/// Decodes a `query_range` response body into samples.
pub(crate) fn decode_response(body: &str, policy: SeriesPolicy) -> crate::Result<Vec<Sample>> {
    let response: QueryResponse =
        serde_json::from_str(body).map_err(|e| BackendError::Decode(e.to_string()))?;

    if response.status != "success" {
        return Err(BackendError::Query {
            body: body.to_string(),
        }
        .into());
    }

    let Some(data) = response.data else {
        return Err(BackendError::Decode("missing data field".to_string()).into());
    };

    let count = data.result.len();
    let mut result = data.result.into_iter();

    let Some(series) = result.next() else {
        log::debug!("no series matched");
        return Ok(vec![]);
    };

    if count > 1 {
        match policy {
            SeriesPolicy::Single => {
                return Err(BackendError::AmbiguousSeries { count }.into());
            }
            SeriesPolicy::First => {
                log::warn!(
                    "{count} series matched, using the first one ({:?})",
                    series.metric
                );
            }
        }
    }

    let mut samples = Vec::with_capacity(series.values.len());
    let mut skipped = 0;

    for (ts, raw) in series.values {
        let value = raw
            .parse::<Value>()
            .map_err(|_| BackendError::Decode(format!("invalid sample value {raw:?} at {ts}")))?;

        // NOTE: Prometheus encodes missing or broken readings as NaN/Inf
        if !value.is_finite() {
            skipped += 1;
            continue;
        }

        samples.push(Sample::new(ts, value));
    }

    if skipped > 0 {
        log::warn!("skipped {skipped} non-finite samples");
    }

    Ok(samples)
}

/// Fetches samples from the `query_range` API of Prometheus (or Grafana's datasource proxy).
pub struct PrometheusSource {
    client: Client,
    config: Config,
}

impl PrometheusSource {
    /// Creates a source, building an HTTP client with the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is invalid, or the HTTP client could not be built.
    pub fn new(config: Config) -> crate::Result<Self> {
        config.validate()?;
        MetricName::try_from(config.metric.as_str())?;
        LabelName::try_from(config.label.as_str())?;

        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self { client, config })
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the configured default step.
    #[must_use]
    pub const fn step(&self) -> Step {
        self.config.step
    }

    /// Returns the series selector of a pool, e.g. `ceph_pool_bytes_used{pool_id="7"}`.
    ///
    /// # Errors
    ///
    /// Returns error if the pool ID is empty.
    pub fn selector(&self, pool_id: &str) -> crate::Result<String> {
        if pool_id.is_empty() {
            return Err(Error::InvalidArgument("pool ID must not be empty".to_string()));
        }

        Ok(Selector::format(
            MetricName::try_from(self.config.metric.as_str())?,
            LabelName::try_from(self.config.label.as_str())?,
            pool_id,
        ))
    }
}

impl SampleSource for PrometheusSource {
    fn fetch(&self, pool_id: &str, range: &DateRange, step: &Step) -> crate::Result<Vec<Sample>> {
        range.check_resolution(step)?;

        let query = self.selector(pool_id)?;
        let url = self.config.backend().query_range_url();

        log::debug!("querying {url}: {query} over {range} (step {step})");

        let mut request = self.client.get(&url).query(&[
            ("query", query),
            ("start", range.start_param()),
            ("end", range.end_param()),
            ("step", step.to_string()),
        ]);

        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }

        let response = request.send()?;
        let status = response.status();
        let body = response.text()?;

        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let mut samples = decode_response(&body, self.config.series_policy)?;
        log::debug!("received {} samples", samples.len());

        retain_window(&mut samples, range);

        Ok(samples)
    }
}

/// Drops samples outside `[range.start(), range.end())`.
///
/// `query_range` evaluates the selector at `end` as well, which belongs to the next period.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn retain_window(samples: &mut Vec<Sample>, range: &DateRange) {
    let start = range.start().timestamp() as Timestamp;
    let end = range.end().timestamp() as Timestamp;

    let before = samples.len();
    samples.retain(|sample| sample.ts >= start && sample.ts < end);

    let dropped = before - samples.len();
    if dropped > 0 {
        log::trace!("dropped {dropped} samples outside of {range}");
    }
}
