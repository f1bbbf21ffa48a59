//! Error types for archive service calls.
//!
//! This module defines structured errors for search and metadata requests,
//! following the What/Why/Fix pattern used across the project.

use thiserror::Error;

/// Errors that can occur while talking to the archive service.
#[derive(Debug, Clone, Error)]
pub enum ArchiveError {
    /// The request never produced a response (DNS, connect, timeout).
    #[error("cannot reach archive at '{url}': {reason}\n  Suggestion: Check your network connection or the --archive-url value")]
    Request {
        /// Request URL
        url: String,
        /// Transport failure description
        reason: String,
    },

    /// The service answered with a non-success status.
    #[error("archive returned HTTP {status} for '{url}'\n  Suggestion: {suggestion}")]
    Status {
        /// Request URL
        url: String,
        /// HTTP status code
        status: u16,
        /// How to fix the issue
        suggestion: String,
    },

    /// The response body was not the expected JSON shape.
    #[error("unexpected archive response from '{url}': {reason}\n  Suggestion: Check that --archive-url points at the archive API")]
    Decode {
        /// Request URL
        url: String,
        /// Parse failure description
        reason: String,
    },

    /// The configured base URL cannot be used to build request URLs.
    #[error("invalid archive URL '{url}': {reason}\n  Suggestion: Use an absolute http(s) URL such as https://archive.org")]
    InvalidUrl {
        /// Offending URL
        url: String,
        /// Parse failure description
        reason: String,
    },

    /// The HTTP client could not be constructed.
    #[error("HTTP client construction failed: {reason}\n  Suggestion: Check proxy environment variables and TLS setup")]
    Client {
        /// Construction failure description
        reason: String,
    },
}

impl ArchiveError {
    /// Creates a `Request` error.
    #[must_use]
    pub fn request(url: &str, reason: &str) -> Self {
        Self::Request {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Creates a `Status` error with a suggestion matched to the status class.
    #[must_use]
    pub fn status(url: &str, status: u16) -> Self {
        let suggestion = match status {
            404 => "Check the identifier or search endpoint path",
            429 => "The archive is rate limiting requests; wait and rerun",
            s if s >= 500 => "The archive is unavailable; try again later",
            _ => "Check the request and try again",
        };
        Self::Status {
            url: url.to_string(),
            status,
            suggestion: suggestion.to_string(),
        }
    }

    /// Creates a `Decode` error.
    #[must_use]
    pub fn decode(url: &str, reason: &str) -> Self {
        Self::Decode {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Creates an `InvalidUrl` error.
    #[must_use]
    pub fn invalid_url(url: &str, reason: &str) -> Self {
        Self::InvalidUrl {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Creates a `Client` error.
    #[must_use]
    pub fn client(reason: &str) -> Self {
        Self::Client {
            reason: reason.to_string(),
        }
    }
}
