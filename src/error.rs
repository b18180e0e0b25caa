//! Error types for kafka-connect-exporter
//!
//! Configuration errors live in [`crate::config`]; everything that can go
//! wrong while talking to the Kafka Connect REST API is a [`CollectorError`].

use thiserror::Error;

/// Broad classification of a collection failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Transport failure: connection refused, reset, timed out
    Network,
    /// The server answered, but not with the document we expected
    Decode,
}

/// Collector 모듈 에러 타입
#[derive(Error, Debug)]
pub enum CollectorError {
    /// HTTP 클라이언트 초기화 실패
    #[error("Failed to initialize HTTP client: {0}")]
    HttpClientInit(#[source] reqwest::Error),

    /// Base URL cannot carry a path (e.g. `mailto:` style URLs)
    #[error("Invalid Kafka Connect base URL: {0}")]
    InvalidBaseUrl(String),

    /// Connector names must be non-empty path segments
    #[error("Invalid connector name {0:?}")]
    InvalidConnectorName(String),

    /// 타임아웃
    /// The value is the configured timeout in milliseconds, if known.
    #[error("Request timed out{}", .0.map(|ms| format!(" after {}ms", ms)).unwrap_or_default())]
    Timeout(Option<u64>),

    /// 연결 또는 전송 실패
    #[error("Request to Kafka Connect failed: {0}")]
    Network(#[source] reqwest::Error),

    /// Non-2xx answer from Kafka Connect
    #[error("Unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// JSON 파싱 에러
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl CollectorError {
    /// Classify this error as a network or decode failure
    pub fn kind(&self) -> ErrorKind {
        match self {
            CollectorError::HttpClientInit(_)
            | CollectorError::Timeout(_)
            | CollectorError::Network(_) => ErrorKind::Network,
            CollectorError::InvalidBaseUrl(_)
            | CollectorError::InvalidConnectorName(_)
            | CollectorError::UnexpectedStatus { .. }
            | CollectorError::Decode(_) => ErrorKind::Decode,
        }
    }

    /// Create a Timeout error with known duration
    pub fn timeout_with_duration(ms: u64) -> Self {
        CollectorError::Timeout(Some(ms))
    }
}

impl From<reqwest::Error> for CollectorError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            // reqwest doesn't expose the configured timeout; the client
            // replaces this with timeout_with_duration() where it knows it.
            CollectorError::Timeout(None)
        } else {
            CollectorError::Network(err)
        }
    }
}

/// Result type alias for collector operations
pub type CollectResult<T> = Result<T, CollectorError>;
