use std::fmt;

/// Result of every network-facing operation.
///
/// Nothing in the retrieval path panics or bubbles a transport error up as
/// anything other than a [`FetchError`]; callers render the message directly.
pub type FetchOutcome<T> = Result<T, FetchError>;

/// Coarse failure classification, suitable for matching in the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NetworkError,
    EmptyBody,
    ParseError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NetworkError => "network",
            ErrorKind::EmptyBody => "empty-body",
            ErrorKind::ParseError => "parse",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// Connectivity, DNS, non-2xx status or timeout.
    #[error("Network error: {0}")]
    Network(String),

    /// The provider answered 2xx but sent nothing.
    #[error("no response body")]
    EmptyBody,

    /// A body arrived but a required field was missing or malformed.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl FetchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FetchError::Network(_) => ErrorKind::NetworkError,
            FetchError::EmptyBody => ErrorKind::EmptyBody,
            FetchError::Parse(_) => ErrorKind::ParseError,
        }
    }

    pub fn timeout() -> Self {
        FetchError::Network("timeout".to_string())
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Parse(err.to_string())
    }
}
