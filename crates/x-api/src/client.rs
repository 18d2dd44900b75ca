// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! X GraphQL client
//!
//! Issues persisted-query `GET` requests authenticated as a browser session.
//! Every request carries the baseline feature flags merged with the caller's,
//! and both `variables` and `features` travel as compact JSON in the query
//! string.
//!
//! Status handling:
//!
//! - `404` means "no such entity" and is reported as `Ok(None)`
//! - any other unsuccessful status, or a body that is not JSON, becomes
//!   [`XApiError::Api`] carrying the status and the raw body
//!
//! Nothing is retried. The underlying connection pool is shared by clones of
//! the client, so one `XClient` can serve independent tasks concurrently.

use std::time::Duration;

use api_client::{GraphqlParams, merge_toggles};
use reqwest::{
    Client, StatusCode,
    header::{AUTHORIZATION, COOKIE, HeaderMap, HeaderName, HeaderValue},
};
use serde_json::{Map, Value};
use tracing::{debug, error, warn};
use url::Url;

use crate::{
    config::XApiConfig,
    endpoints::{Likes, Posts, Users},
    error::{XApiError, XApiResult},
    features::DEFAULT_FEATURES,
    pages::Pages,
};

// Public token embedded in the x.com web client
const BEARER_AUTHORIZATION: &str = "Bearer AAAAAAAAAAAAAAAAAAAAANRILgAAAAAAnNwIzUejRCOuH5E6I8xnZz4puTs%3D1Zv7ttfk8LF81IUq16cHjhLTvJu4FA33AGWWjCpTnA";

const CSRF_HEADER: &str = "x-csrf-token";
const CLIENT_LANGUAGE_HEADER: &str = "x-twitter-client-language";
const ACTIVE_USER_HEADER: &str = "x-twitter-active-user";
const AUTH_TYPE_HEADER: &str = "x-twitter-auth-type";

/// X GraphQL API client
#[derive(Debug, Clone)]
pub struct XClient {
    client: Client,
    base_url: Url,
    timeout_seconds: u64,
}

impl XClient {
    /// Create a new client for the given session
    ///
    /// # Errors
    ///
    /// Fails before any network activity when the `ct0` cookie is missing, when
    /// a cookie cannot be sent as a header, or when the HTTP client cannot be built.
    pub fn new(config: XApiConfig) -> XApiResult<Self> {
        let csrf_token = config.cookies.csrf_token()?;

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static(BEARER_AUTHORIZATION));
        headers.insert(
            HeaderName::from_static(CSRF_HEADER),
            sensitive_header(csrf_token, "ct0")?,
        );
        headers.insert(
            COOKIE,
            sensitive_header(&config.cookies.header_value(), "cookie")?,
        );
        headers.insert(
            HeaderName::from_static(CLIENT_LANGUAGE_HEADER),
            HeaderValue::from_static("en"),
        );
        headers.insert(
            HeaderName::from_static(ACTIVE_USER_HEADER),
            HeaderValue::from_static("yes"),
        );
        headers.insert(
            HeaderName::from_static(AUTH_TYPE_HEADER),
            HeaderValue::from_static("OAuth2Session"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(XApiError::Http)?;

        debug!(
            base_url = %config.base_url,
            cookies = config.cookies.len(),
            "created X API client"
        );

        Ok(Self {
            client,
            base_url: config.base_url,
            timeout_seconds: config.timeout_seconds,
        })
    }

    /// Fetch one object
    ///
    /// `features` are layered over the baseline flags.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(json))` on success
    /// * `Ok(None)` if the remote answered `404`
    /// * `Err(error)` on any other failure
    pub async fn single_request(
        &self,
        operation: &str,
        variables: Map<String, Value>,
        features: &[(&str, bool)],
    ) -> XApiResult<Option<Value>> {
        let params = GraphqlParams::new(variables, merge_toggles(DEFAULT_FEATURES, features));
        self.fetch(operation, &params).await
    }

    /// Page through a timeline
    ///
    /// Nothing is sent until the first [`Pages::next_page`] call. `limit` caps
    /// the number of entries produced over the whole sequence.
    pub fn list_request(
        &self,
        operation: &str,
        variables: Map<String, Value>,
        features: &[(&str, bool)],
        limit: Option<usize>,
    ) -> Pages<'_> {
        let params = GraphqlParams::new(variables, merge_toggles(DEFAULT_FEATURES, features));
        Pages::new(self, operation, params, limit)
    }

    /// Profile lookups
    pub fn users(&self) -> Users<'_> {
        Users::new(self)
    }

    /// Single post lookups
    pub fn posts(&self) -> Posts<'_> {
        Posts::new(self)
    }

    /// Liked-posts timelines
    pub fn likes(&self) -> Likes<'_> {
        Likes::new(self)
    }

    pub(crate) async fn fetch(
        &self,
        operation: &str,
        params: &GraphqlParams,
    ) -> XApiResult<Option<Value>> {
        let url = self
            .base_url
            .join(operation)
            .map_err(|e| XApiError::Config(format!("invalid operation `{operation}`: {e}")))?;

        debug!(operation, cursor = params.cursor(), "sending GraphQL request");

        let response = self
            .client
            .get(url)
            .query(&params.encode())
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!(operation, "entity not found");
            return Ok(None);
        }

        let body = response.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            error!(operation, status = status.as_u16(), body, "X API error");
            return Err(XApiError::Api {
                status: status.as_u16(),
                body,
            });
        }

        match serde_json::from_str(&body) {
            Ok(json) => Ok(Some(json)),
            Err(e) => {
                warn!(operation, error = %e, "X API returned a non-JSON body");
                Err(XApiError::Api {
                    status: status.as_u16(),
                    body,
                })
            }
        }
    }

    fn transport_error(&self, error: reqwest::Error) -> XApiError {
        if error.is_timeout() {
            XApiError::Timeout {
                seconds: self.timeout_seconds,
            }
        } else {
            XApiError::Http(error)
        }
    }
}

fn sensitive_header(value: &str, name: &str) -> XApiResult<HeaderValue> {
    let mut header = HeaderValue::from_str(value).map_err(|_| {
        XApiError::Cookies(format!("`{name}` contains characters not allowed in a header"))
    })?;
    header.set_sensitive(true);
    Ok(header)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cookies::CookieJar;

    #[test]
    fn client_requires_csrf_cookie() {
        let cookies: CookieJar = [("auth_token", "secret")].into_iter().collect();

        let result = XClient::new(XApiConfig::new(cookies));

        assert!(matches!(result, Err(XApiError::MissingCookie { .. })));
    }

    #[test]
    fn client_rejects_header_unsafe_cookie() {
        let cookies: CookieJar = [("ct0", "bad\nvalue")].into_iter().collect();

        let result = XClient::new(XApiConfig::new(cookies));

        assert!(matches!(result, Err(XApiError::Cookies(_))));
    }

    #[tokio::test]
    async fn client_creation_success() {
        let cookies: CookieJar = [("ct0", "token"), ("auth_token", "secret")]
            .into_iter()
            .collect();

        assert!(XClient::new(XApiConfig::new(cookies)).is_ok());
    }
}
