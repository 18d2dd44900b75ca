// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Post identifiers and links

use std::{fmt, str::FromStr, sync::LazyLock};

use regex::Regex;

use crate::error::{XApiError, XApiResult};

static PERMALINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://(?:www\.)?(?:x|twitter)\.com/(\w+)/status/(\d+)(?:/[^?#\s]*)?(?:[?#]\S*)?$")
        .expect("permalink regex is valid")
});

static LINK_IN_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)https?://(?:www\.)?(?:x|twitter|fxtwitter|fixupx|vxtwitter)\.com/(\w+)/status/(\d+)",
    )
    .expect("link regex is valid")
});

static HASHTAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#[\p{L}0-9_]+").expect("hashtag regex is valid"));

static URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+").expect("url regex is valid"));

/// Validated post identifier, ASCII digits only
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PostId(String);

impl PostId {
    /// Accept a bare numeric id or a post permalink
    ///
    /// Anything else is rejected locally, without touching the network.
    pub fn parse(input: &str) -> XApiResult<Self> {
        let trimmed = input.trim();

        if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Ok(Self(trimmed.to_string()));
        }

        PERMALINK
            .captures(trimmed)
            .and_then(|captures| captures.get(2))
            .map(|id| Self(id.as_str().to_string()))
            .ok_or_else(|| XApiError::InvalidPostId {
                input: input.to_string(),
            })
    }

    /// The id as text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for PostId {
    type Err = XApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for PostId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Every post linked from a free-form message, in order of appearance
///
/// Mirror hosts such as `fxtwitter.com` are recognized too. Repeated links are
/// reported once.
pub fn find_post_links(text: &str) -> Vec<PostId> {
    let mut found: Vec<PostId> = Vec::new();

    for captures in LINK_IN_TEXT.captures_iter(text) {
        if let Some(id) = captures.get(2) {
            let id = PostId(id.as_str().to_string());
            if !found.contains(&id) {
                found.push(id);
            }
        }
    }

    found
}

/// Check if a message contains at least one post link
pub fn contains_post_link(text: &str) -> bool {
    LINK_IN_TEXT.is_match(text)
}

/// Canonical permalink; `i` stands in for an unknown author
pub fn post_url(post_id: &PostId, username: Option<&str>) -> String {
    format!("https://x.com/{}/status/{post_id}", username.unwrap_or("i"))
}

/// Strip hashtags and links from a caption
pub fn cleanup_text(text: &str) -> String {
    let without_tags = HASHTAG.replace_all(text, "");
    URL.replace_all(&without_tags, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_id_from_permalink() {
        let id = PostId::parse("https://x.com/someuser/status/98765").unwrap();
        assert_eq!(id.as_str(), "98765");
    }

    #[test]
    fn accepts_permalink_variants() {
        for link in [
            "https://x.com/someuser/status/98765?s=20",
            "https://twitter.com/someuser/status/98765",
            "https://www.x.com/someuser/status/98765/photo/1",
            "http://x.com/some_user/status/98765#m",
        ] {
            assert_eq!(PostId::parse(link).unwrap().as_str(), "98765", "{link}");
        }
    }

    #[test]
    fn accepts_bare_numeric_id() {
        let id: PostId = " 1234567890123456789 ".parse().unwrap();
        assert_eq!(id.to_string(), "1234567890123456789");
    }

    #[test]
    fn rejects_other_input() {
        for input in [
            "",
            "12a45",
            "https://example.com/someuser/status/98765",
            "https://x.com/someuser/likes",
            "https://x.com/someuser/status/abc",
            "see https://x.com/someuser/status/98765",
        ] {
            assert!(
                matches!(PostId::parse(input), Err(XApiError::InvalidPostId { .. })),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn finds_links_in_message() {
        let text = "look https://fxtwitter.com/a/status/1 and https://X.com/b/status/2?s=1 \
                    plus https://x.com/a/status/1 again";

        let found = find_post_links(text);

        assert_eq!(
            found.iter().map(PostId::as_str).collect::<Vec<_>>(),
            vec!["1", "2"]
        );
        assert!(contains_post_link(text));
        assert!(!contains_post_link("https://x.com/home"));
    }

    #[test]
    fn canonical_url_falls_back_to_placeholder_handle() {
        let id = PostId::parse("42").unwrap();

        assert_eq!(post_url(&id, Some("someuser")), "https://x.com/someuser/status/42");
        assert_eq!(post_url(&id, None), "https://x.com/i/status/42");
    }

    #[test]
    fn cleanup_removes_tags_and_links() {
        assert_eq!(
            cleanup_text("Sunset #photo #日本 https://t.co/abc "),
            "Sunset"
        );
        assert_eq!(cleanup_text("plain"), "plain");
    }
}
