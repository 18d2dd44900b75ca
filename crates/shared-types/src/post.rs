// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Post and media snapshots

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::User;

/// Kind of media attached to a post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    /// Still image
    Photo,
    /// Video clip
    Video,
    /// Looping GIF, served as a silent mp4
    AnimatedGif,
}

/// Returned when the remote reports a media type we do not model
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown media type: {0}")]
pub struct UnknownMediaType(pub String);

impl MediaType {
    /// Wire name used by the remote API
    pub fn as_str(self) -> &'static str {
        match self {
            MediaType::Photo => "photo",
            MediaType::Video => "video",
            MediaType::AnimatedGif => "animated_gif",
        }
    }

    /// Check if this is a still image
    pub fn is_photo(self) -> bool {
        matches!(self, MediaType::Photo)
    }
}

impl FromStr for MediaType {
    type Err = UnknownMediaType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "photo" => Ok(MediaType::Photo),
            "video" => Ok(MediaType::Video),
            "animated_gif" => Ok(MediaType::AnimatedGif),
            other => Err(UnknownMediaType(other.to_string())),
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single media attachment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Media {
    /// Numeric media identifier
    pub media_id: u64,
    /// Opaque key, stable across API versions
    pub media_key: String,
    /// Base asset URL, without size or format suffix
    pub url: String,
    /// Kind of media
    pub media_type: MediaType,
    /// Best mp4 rendition for videos and GIFs
    pub video_url: Option<String>,
}

impl Media {
    /// Full-size rendition of a photo
    ///
    /// Returns `None` for videos and GIFs, whose base URL points at a thumbnail.
    pub fn large_url(&self) -> Option<String> {
        self.is_photo()
            .then(|| format!("{}?format=jpg&name=large", self.url))
    }

    /// Check if this attachment is a still image
    pub fn is_photo(&self) -> bool {
        self.media_type.is_photo()
    }
}

/// A post snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Numeric-looking identifier, kept as a string
    pub post_id: String,
    /// Author profile
    pub author: User,
    /// Attachments, in display order
    pub media: Vec<Media>,
    /// Full text, when the payload carried it
    pub text: Option<String>,
    /// Creation time, when the payload carried it
    pub created_at: Option<DateTime<Utc>>,
}

impl Post {
    /// Permalink built from the author handle and the post id
    pub fn url(&self) -> String {
        format!(
            "https://x.com/{}/status/{}",
            self.author.username, self.post_id
        )
    }

    /// Photos only
    pub fn photos(&self) -> impl Iterator<Item = &Media> {
        self.media.iter().filter(|media| media.is_photo())
    }

    /// Check if the post has any video or GIF attachment
    pub fn has_video(&self) -> bool {
        self.media.iter().any(|media| !media.is_photo())
    }
}
