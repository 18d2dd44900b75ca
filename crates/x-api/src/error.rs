// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for the X client
//!
//! A remote 404 is not an error: single-entity calls report it as `Ok(None)` and
//! pagination treats it as the end of the timeline. Everything else that goes
//! wrong is scoped to the call that triggered it and is never retried.

use api_client::DecodeError;
use thiserror::Error;

/// Result type alias for X client operations
pub type XApiResult<T> = Result<T, XApiError>;

/// Errors specific to the X API client
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum XApiError {
    /// Transport-level failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Unsuccessful status or unparsable body
    #[error("Unexpected error from X API: {status} {body}")]
    Api { status: u16, body: String },

    /// The transport gave up waiting
    #[error("Request timeout after {seconds} seconds")]
    Timeout { seconds: u64 },

    /// A cookie the session cannot work without is absent
    #[error("Required cookie `{name}` is missing")]
    MissingCookie { name: String },

    /// Caller passed something that is neither a post id nor a post link
    #[error("Invalid post identifier: {input}")]
    InvalidPostId { input: String },

    /// Caller passed an empty or malformed handle
    #[error("Invalid username: {input}")]
    InvalidUsername { input: String },

    /// Cookie export could not be understood
    #[error("Invalid cookies: {0}")]
    Cookies(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Payload did not match the expected entity shape
    #[error("Unexpected response shape: {0}")]
    Decode(#[from] DecodeError),
}

impl XApiError {
    /// HTTP status reported by the remote, if the error came from a response
    pub fn status(&self) -> Option<u16> {
        match self {
            XApiError::Api { status, .. } => Some(*status),
            XApiError::Http(error) => error.status().map(|status| status.as_u16()),
            _ => None,
        }
    }

    /// Check if the error was raised locally, before any request was sent
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            XApiError::MissingCookie { .. }
                | XApiError::InvalidPostId { .. }
                | XApiError::InvalidUsername { .. }
                | XApiError::Cookies(_)
                | XApiError::Config(_)
        )
    }
}
