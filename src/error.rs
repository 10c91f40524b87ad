// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Error types for AutoCSP
//!
//! Only a failed top-level page fetch is fatal. Every other failure in the
//! pipeline degrades to partial data, so most variants here exist for the
//! fetcher, configuration, and output layers.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for AutoCSP operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for AutoCSP
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP client construction or transport failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Page fetch failed after exhausting retries
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Headless browser engine missing or failed to launch/navigate
    #[error("Runtime collector unavailable: {0}")]
    RuntimeUnavailable(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Classification of failures observed by the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    /// Fetch aborted by its deadline
    Timeout,
    /// Transport-level failure other than timeout
    Network,
    /// HTML or CSS that could not be fully parsed
    ParseDegraded,
    /// Browser engine missing or failed
    RuntimeUnavailable,
}

impl ErrorKind {
    /// Wire name of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Timeout => "timeout",
            ErrorKind::Network => "network",
            ErrorKind::ParseDegraded => "parse-degraded",
            ErrorKind::RuntimeUnavailable => "runtime-unavailable",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured page-fetch failure
///
/// Carries the attempt count and retry budget so callers can report how hard
/// the fetcher tried before giving up.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
#[error("Fetch of {url} failed ({kind}) after {attempt} attempt(s): {message}")]
pub struct FetchError {
    /// Failure classification
    pub kind: ErrorKind,
    /// Underlying transport message
    pub message: String,
    /// Requested URL
    pub url: String,
    /// Number of attempts made
    pub attempt: u32,
    /// Retry budget that was configured
    pub retries: u32,
}

impl FetchError {
    /// Create a timeout failure
    pub fn timeout(url: impl Into<String>, message: impl Into<String>, attempt: u32, retries: u32) -> Self {
        Self {
            kind: ErrorKind::Timeout,
            message: message.into(),
            url: url.into(),
            attempt,
            retries,
        }
    }

    /// Create a network failure
    pub fn network(url: impl Into<String>, message: impl Into<String>, attempt: u32, retries: u32) -> Self {
        Self {
            kind: ErrorKind::Network,
            message: message.into(),
            url: url.into(),
            attempt,
            retries,
        }
    }
}

impl Error {
    /// Create a runtime-unavailable error
    pub fn runtime_unavailable<S: Into<String>>(msg: S) -> Self {
        Error::RuntimeUnavailable(msg.into())
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }

    /// Failure classification, when the error maps onto one
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Error::Fetch(e) => Some(e.kind),
            Error::Http(e) if e.is_timeout() => Some(ErrorKind::Timeout),
            Error::Http(_) => Some(ErrorKind::Network),
            Error::RuntimeUnavailable(_) => Some(ErrorKind::RuntimeUnavailable),
            _ => None,
        }
    }

    /// Check if this is a timeout error
    pub fn is_timeout(&self) -> bool {
        self.kind() == Some(ErrorKind::Timeout)
    }

    /// Check if this is a network error
    pub fn is_network(&self) -> bool {
        self.kind() == Some(ErrorKind::Network)
    }

    /// Get URL if available
    pub fn url(&self) -> Option<&str> {
        match self {
            Error::Fetch(e) => Some(&e.url),
            Error::Http(e) => e.url().map(|u| u.as_str()),
            _ => None,
        }
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Other(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_kind() {
        let err: Error = FetchError::timeout("https://example.com", "deadline elapsed", 3, 2).into();

        assert!(err.is_timeout());
        assert!(!err.is_network());
        assert_eq!(err.url(), Some("https://example.com"));
    }

    #[test]
    fn test_fetch_error_display() {
        let err = FetchError::network("https://example.com", "connection refused", 3, 2);
        let msg = err.to_string();

        assert!(msg.contains("network"));
        assert!(msg.contains("3 attempt(s)"));
        assert!(msg.contains("connection refused"));
    }

    #[test]
    fn test_kind_wire_names() {
        assert_eq!(ErrorKind::ParseDegraded.to_string(), "parse-degraded");
        assert_eq!(
            serde_json::to_string(&ErrorKind::RuntimeUnavailable).unwrap(),
            "\"runtime-unavailable\""
        );
    }

    #[test]
    fn test_runtime_unavailable() {
        let err = Error::runtime_unavailable("no browser");
        assert_eq!(err.kind(), Some(ErrorKind::RuntimeUnavailable));
        assert!(err.url().is_none());
    }
}
