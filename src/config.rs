use crate::{Error, SeriesPolicy, Step};
use std::time::Duration;

/// Default metric holding the bytes used by a pool
pub const DEFAULT_METRIC: &str = "ceph_pool_bytes_used";

/// Default label identifying the pool
pub const DEFAULT_LABEL: &str = "pool_id";

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Where range queries are sent to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Backend {
    /// A Prometheus-compatible server, queried directly
    Prometheus {
        /// Base URL, e.g. `http://prometheus:9090`
        url: String,
    },

    /// A Prometheus datasource, queried through Grafana's datasource proxy
    Grafana {
        /// Base URL, e.g. `http://grafana:3000`
        url: String,

        /// Numeric datasource ID
        datasource_id: u64,
    },
}

impl Backend {
    /// URL of the range query endpoint.
    #[must_use]
    pub fn query_range_url(&self) -> String {
        match self {
            Self::Prometheus { url } => {
                format!("{}/api/v1/query_range", url.trim_end_matches('/'))
            }
            Self::Grafana { url, datasource_id } => format!(
                "{}/api/datasources/proxy/{datasource_id}/api/v1/query_range",
                url.trim_end_matches('/'),
            ),
        }
    }
}

/// Configuration of a [`crate::PrometheusSource`].
///
/// ```
/// use poolusage::Config;
/// use std::time::Duration;
///
/// let config = Config::grafana("http://grafana:3000", 2)
///     .timeout(Duration::from_secs(10))
///     .token(Some("glsa_xyz".into()));
///
/// assert_eq!(
///     "http://grafana:3000/api/datasources/proxy/2/api/v1/query_range",
///     config.backend().query_range_url(),
/// );
/// ```
#[derive(Clone, Debug)]
pub struct Config {
    backend: Backend,
    pub(crate) metric: String,
    pub(crate) label: String,
    pub(crate) step: Step,
    pub(crate) timeout: Duration,
    pub(crate) token: Option<String>,
    pub(crate) series_policy: SeriesPolicy,
}

impl Config {
    /// Creates a configuration for the given backend.
    #[must_use]
    pub fn new(backend: Backend) -> Self {
        Self {
            backend,
            metric: DEFAULT_METRIC.to_string(),
            label: DEFAULT_LABEL.to_string(),
            step: Step::default(),
            timeout: DEFAULT_TIMEOUT,
            token: None,
            series_policy: SeriesPolicy::default(),
        }
    }

    /// Queries a Prometheus server directly.
    #[must_use]
    pub fn prometheus<S: Into<String>>(url: S) -> Self {
        Self::new(Backend::Prometheus { url: url.into() })
    }

    /// Queries a Prometheus datasource through Grafana.
    #[must_use]
    pub fn grafana<S: Into<String>>(url: S, datasource_id: u64) -> Self {
        Self::new(Backend::Grafana {
            url: url.into(),
            datasource_id,
        })
    }

    /// Returns the backend.
    #[must_use]
    pub const fn backend(&self) -> &Backend {
        &self.backend
    }

    /// Sets the metric to query.
    ///
    /// Default = `ceph_pool_bytes_used`
    #[must_use]
    pub fn metric<S: Into<String>>(mut self, metric: S) -> Self {
        self.metric = metric.into();
        self
    }

    /// Sets the label that identifies the pool.
    ///
    /// Default = `pool_id`
    #[must_use]
    pub fn label<S: Into<String>>(mut self, label: S) -> Self {
        self.label = label.into();
        self
    }

    /// Sets the default sampling step.
    ///
    /// Default = 1h
    #[must_use]
    pub fn step(mut self, step: Step) -> Self {
        self.step = step;
        self
    }

    /// Sets the request timeout.
    ///
    /// Default = 30s
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the bearer token sent in the `Authorization` header.
    ///
    /// Empty tokens are ignored.
    #[must_use]
    pub fn token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    /// Sets what happens if the selector matches more than one series.
    ///
    /// Default = [`SeriesPolicy::Single`]
    #[must_use]
    pub fn series_policy(mut self, policy: SeriesPolicy) -> Self {
        self.series_policy = policy;
        self
    }

    pub(crate) fn validate(&self) -> crate::Result<()> {
        if self.timeout.is_zero() {
            return Err(Error::InvalidArgument(
                "timeout must be greater than zero".to_string(),
            ));
        }

        let url = match &self.backend {
            Backend::Prometheus { url } | Backend::Grafana { url, .. } => url,
        };

        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(Error::InvalidArgument(format!(
                "backend URL must start with http:// or https://, got {url:?}"
            )));
        }

        Ok(())
    }
}
