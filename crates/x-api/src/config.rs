// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Client configuration

use url::Url;

use crate::{
    cookies::CookieJar,
    error::{XApiError, XApiResult},
};

/// Root of the persisted-query endpoints
pub const DEFAULT_BASE_URL: &str = "https://x.com/i/api/graphql/";

/// Desktop browser string sent when none is configured
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Configuration for the X API client
#[derive(Debug, Clone)]
pub struct XApiConfig {
    /// Base URL, always ending with `/`
    pub base_url: Url,
    /// Logged-in session cookies, must include `ct0`
    pub cookies: CookieJar,
    /// `User-Agent` header value
    pub user_agent: String,
    /// Transport timeout in seconds
    pub timeout_seconds: u64,
}

impl XApiConfig {
    /// Configuration for the public endpoint with the given session
    #[allow(clippy::missing_panics_doc)]
    pub fn new(cookies: CookieJar) -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            cookies,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }

    /// Point the client at another host, such as a mock server
    pub fn with_base_url(mut self, base_url: &str) -> XApiResult<Self> {
        let base_url = base_url.trim();
        if base_url.is_empty() {
            return Err(XApiError::Config("Base URL cannot be empty".to_string()));
        }

        // `Url::join` replaces the last segment unless the base ends with a slash
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };

        self.base_url = Url::parse(&normalized)
            .map_err(|e| XApiError::Config(format!("invalid base URL `{base_url}`: {e}")))?;
        Ok(self)
    }

    /// Override the `User-Agent` header
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Override the transport timeout
    pub fn with_timeout_seconds(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }
}
