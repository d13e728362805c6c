/// Failure talking to the time series backend.
#[derive(Debug)]
pub enum BackendError {
    /// The HTTP request could not be completed (connect, timeout, body read).
    Transport(reqwest::Error),

    /// The backend answered with a non-2xx status.
    Status {
        /// HTTP status code
        status: u16,

        /// Raw response body
        body: String,
    },

    /// The backend answered, but its `status` field was not `success`.
    Query {
        /// Raw response body
        body: String,
    },

    /// The response body could not be decoded.
    Decode(String),

    /// More than one series matched the selector.
    AmbiguousSeries {
        /// Number of series returned
        count: usize,
    },
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(e) => {
                write!(f, "request failed: {e}")
            }
            Self::Status { status, body } => {
                write!(f, "backend returned HTTP {status}: {body}")
            }
            Self::Query { body } => {
                write!(f, "backend error: {body}")
            }
            Self::Decode(msg) => {
                write!(f, "malformed response: {msg}")
            }
            Self::AmbiguousSeries { count } => {
                write!(f, "selector matched {count} series, expected exactly one")
            }
        }
    }
}

/// Error type
#[derive(Debug)]
pub enum Error {
    /// An IO error.
    Io(std::io::Error),

    /// Bad user input (grouping mode, dates, step, selector).
    InvalidArgument(String),

    /// The backend could not be queried or reported an error.
    Backend(BackendError),

    /// The query succeeded, but returned no samples.
    EmptyInput,
}

impl From<BackendError> for Error {
    fn from(value: BackendError) -> Self {
        Self::Backend(value)
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<reqwest::Error> for Error {
    fn from(value: reqwest::Error) -> Self {
        Self::Backend(BackendError::Transport(value))
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => {
                write!(f, "{e}")
            }
            Self::InvalidArgument(msg) => {
                write!(f, "invalid argument: {msg}")
            }
            Self::Backend(e) => {
                write!(f, "{e}")
            }
            Self::EmptyInput => {
                write!(f, "No data in this interval")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Backend(BackendError::Transport(e)) => Some(e),
            _ => None,
        }
    }
}

/// Result helper type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn empty_input_message() {
        assert_eq!("No data in this interval", Error::EmptyInput.to_string());
    }

    #[test_log::test]
    fn backend_error_keeps_payload() {
        let err: Error = BackendError::Query {
            body: r#"{"status":"error","error":"bad_data"}"#.into(),
        }
        .into();

        assert!(err.to_string().contains("bad_data"));
    }
}
