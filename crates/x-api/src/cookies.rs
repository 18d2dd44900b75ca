// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Session cookies
//!
//! The client authenticates as a logged-in browser session, so it needs the
//! cookies of such a session. They are usually pasted from a browser extension
//! export, optionally base64-encoded to survive environment variables.
//!
//! Accepted layouts:
//!
//! - a plain `{"name": "value"}` object
//! - a "Cookie Quick Manager" export: an array of objects with `Name raw`,
//!   `Content raw` and `Host raw`
//! - a generic extension export: an array of objects with `name` and `value`

use std::{collections::BTreeMap, fmt};

use base64::{Engine, engine::general_purpose::STANDARD};
use serde_json::Value;

use crate::error::{XApiError, XApiResult};

/// Name of the cookie holding the CSRF token
pub const CSRF_COOKIE: &str = "ct0";

/// Ordered set of session cookies
///
/// `Debug` output lists cookie names only.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CookieJar(BTreeMap<String, String>);

impl CookieJar {
    /// Create an empty jar
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a cookie export, base64-wrapped or not
    pub fn decode(raw: &str) -> XApiResult<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(XApiError::Cookies("cookie export is empty".to_string()));
        }

        let parsed = STANDARD
            .decode(raw)
            .ok()
            .and_then(|bytes| String::from_utf8(bytes).ok())
            .and_then(|text| serde_json::from_str::<Value>(&text).ok());

        let value = match parsed {
            Some(value) => value,
            None => serde_json::from_str::<Value>(raw)
                .map_err(|e| XApiError::Cookies(format!("not JSON or base64 JSON: {e}")))?,
        };

        Self::from_json(&value)
    }

    /// Build a jar from an already parsed export
    pub fn from_json(value: &Value) -> XApiResult<Self> {
        match value {
            Value::Object(map) => map
                .iter()
                .map(|(name, value)| match value {
                    Value::String(value) => Ok((name.clone(), value.clone())),
                    other => Err(XApiError::Cookies(format!(
                        "cookie `{name}` must be a string, got {other}"
                    ))),
                })
                .collect(),
            Value::Array(items) => items.iter().map(exported_cookie).collect(),
            other => Err(XApiError::Cookies(format!(
                "expected an object or an array, got {other}"
            ))),
        }
    }

    /// Add or replace a cookie
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    /// Value of a cookie
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// CSRF token the API expects echoed in `x-csrf-token`
    pub fn csrf_token(&self) -> XApiResult<&str> {
        self.get(CSRF_COOKIE)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| XApiError::MissingCookie {
                name: CSRF_COOKIE.to_string(),
            })
    }

    /// Number of cookies
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the jar is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Render as a `Cookie` header value
    pub fn header_value(&self) -> String {
        self.0
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

fn exported_cookie(item: &Value) -> XApiResult<(String, String)> {
    let field = |key: &str| item.get(key).and_then(Value::as_str);

    let pair = match (field("Name raw"), field("Content raw")) {
        (Some(name), Some(value)) => Some((name, value)),
        _ => field("name").zip(field("value")),
    };

    pair.map(|(name, value)| (name.to_string(), value.to_string()))
        .ok_or_else(|| XApiError::Cookies(format!("unrecognized cookie entry: {item}")))
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CookieJar {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }
}

impl fmt::Debug for CookieJar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.0.keys()).finish()
    }
}
