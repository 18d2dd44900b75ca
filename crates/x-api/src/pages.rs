// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Cursor pagination over timeline responses
//!
//! [`Pages`] is a pull-based state machine: each [`Pages::next_page`] call
//! issues at most one request, so there is never more than one request in
//! flight and memory stays bounded to one page. Dropping the value abandons
//! the iteration.
//!
//! ```text
//! Fetching(cursor = None) --entries--> emit --bottom cursor--> Fetching(cursor)
//!         |                              |
//!         +--no entries / 404--> Done    +--no cursor / limit reached--> Done
//!         +--error--> (error returned once) Done
//! ```

use api_client::{Decoder, GraphqlParams, find_key, find_key_with_prefix, lookup_any};
use serde_json::Value;
use tracing::{debug, warn};

use crate::{client::XClient, error::XApiResult};

/// `entryId` prefixes of timeline entries that carry no content
pub const NON_CONTENT_PREFIXES: [&str; 2] = ["cursor-", "messageprompt-"];

const BOTTOM_CURSOR_PREFIX: &str = "cursor-bottom";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageState {
    Fetching,
    Done,
}

/// Lazy sequence of raw timeline pages
#[derive(Debug)]
pub struct Pages<'a> {
    client: &'a XClient,
    operation: String,
    params: GraphqlParams,
    limit: Option<usize>,
    produced: usize,
    state: PageState,
}

impl<'a> Pages<'a> {
    pub(crate) fn new(
        client: &'a XClient,
        operation: &str,
        params: GraphqlParams,
        limit: Option<usize>,
    ) -> Self {
        Self {
            client,
            operation: operation.to_string(),
            params,
            limit,
            produced: 0,
            state: PageState::Fetching,
        }
    }

    /// Fetch the next page of content entries
    ///
    /// # Returns
    ///
    /// * `Ok(Some(entries))` with at least one entry
    /// * `Ok(None)` once the timeline is exhausted; no further requests are made
    /// * `Err(error)` when the request failed; the sequence is then finished
    pub async fn next_page(&mut self) -> XApiResult<Option<Vec<Value>>> {
        if self.state == PageState::Done || self.limit_reached() {
            self.state = PageState::Done;
            return Ok(None);
        }

        let body = match self.client.fetch(&self.operation, &self.params).await {
            Ok(Some(body)) => body,
            Ok(None) => {
                self.state = PageState::Done;
                return Ok(None);
            }
            Err(error) => {
                self.state = PageState::Done;
                return Err(error);
            }
        };

        let mut entries = content_entries(&body);
        if entries.is_empty() {
            debug!(operation = self.operation.as_str(), "timeline exhausted");
            self.state = PageState::Done;
            return Ok(None);
        }

        if let Some(limit) = self.limit {
            entries.truncate(limit.saturating_sub(self.produced));
        }
        self.produced += entries.len();

        match bottom_cursor(&body) {
            Some(cursor) if !self.limit_reached() => self.params.set_cursor(cursor),
            _ => self.state = PageState::Done,
        }

        debug!(
            operation = self.operation.as_str(),
            entries = entries.len(),
            produced = self.produced,
            "fetched timeline page"
        );

        Ok(Some(entries))
    }

    /// Check if the sequence has finished
    pub fn is_done(&self) -> bool {
        self.state == PageState::Done
    }

    /// Cursor the next request will send
    pub fn cursor(&self) -> Option<&str> {
        self.params.cursor()
    }

    /// Number of entries produced so far
    pub fn produced(&self) -> usize {
        self.produced
    }

    /// Decode every entry with `decode`
    pub fn decoded<T>(self, decode: Decoder<T>) -> DecodedPages<'a, T> {
        DecodedPages {
            pages: self,
            decode,
        }
    }

    fn limit_reached(&self) -> bool {
        self.limit.is_some_and(|limit| self.produced >= limit)
    }
}

/// Lazy sequence of decoded timeline pages
///
/// Entries that fail to decode are logged and skipped; the rest of the page is
/// still returned. A page where every entry was skipped comes back empty rather
/// than ending the sequence.
#[derive(Debug)]
pub struct DecodedPages<'a, T> {
    pages: Pages<'a>,
    decode: Decoder<T>,
}

impl<T> DecodedPages<'_, T> {
    /// Fetch and decode the next page
    pub async fn next_page(&mut self) -> XApiResult<Option<Vec<T>>> {
        let Some(entries) = self.pages.next_page().await? else {
            return Ok(None);
        };

        let decoded = entries
            .iter()
            .filter_map(|entry| match (self.decode)(entry) {
                Ok(item) => Some(item),
                Err(error) => {
                    let entry_id = entry.get("entryId").and_then(Value::as_str);
                    warn!(
                        entry_id,
                        %error,
                        "skipping malformed timeline entry"
                    );
                    None
                }
            })
            .collect();

        Ok(Some(decoded))
    }

    /// Drain the sequence into one list
    pub async fn collect_all(mut self) -> XApiResult<Vec<T>> {
        let mut items = Vec::new();
        while let Some(page) = self.next_page().await? {
            items.extend(page);
        }
        Ok(items)
    }

    /// Check if the sequence has finished
    pub fn is_done(&self) -> bool {
        self.pages.is_done()
    }
}

/// Timeline entries of a response, minus cursor and prompt markers
///
/// Entries without an `entryId` are dropped as well.
pub fn content_entries(body: &Value) -> Vec<Value> {
    let Some(Value::Array(entries)) = find_key(body, "entries") else {
        return Vec::new();
    };

    entries
        .iter()
        .filter(|entry| {
            entry
                .get("entryId")
                .and_then(Value::as_str)
                .is_some_and(|id| !NON_CONTENT_PREFIXES.iter().any(|prefix| id.starts_with(prefix)))
        })
        .cloned()
        .collect()
}

/// Token of the bottom cursor marker, if the response has one
pub fn bottom_cursor(body: &Value) -> Option<String> {
    let content = find_key_with_prefix(body, "entryId", BOTTOM_CURSOR_PREFIX)?.get("content")?;

    lookup_any(content, &[&["value"], &["itemContent", "value"]])
        .and_then(Value::as_str)
        .map(str::to_string)
}
