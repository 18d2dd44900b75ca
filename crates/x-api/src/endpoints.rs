// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Endpoint facades
//!
//! Each remote query is an [`Operation`] constant; the facades only bind one to
//! a borrowed [`XClient`] and add the per-call variables.

use api_client::Operation;
use serde_json::{Map, Value, json};
use shared_types::{Post, User};
use tracing::{debug, warn};

use crate::{
    client::XClient,
    decode::{decode_conversation, decode_timeline_entry, decode_user_response},
    error::{XApiError, XApiResult},
    links::PostId,
    pages::DecodedPages,
};

/// Page size the web client uses for likes
pub const DEFAULT_LIKES_PAGE_SIZE: u32 = 20;

/// Profile lookup by handle
pub const USER_BY_SCREEN_NAME: Operation<Option<User>> = Operation {
    id: "1VOOyvKkiI3FMmkeDNxM9A/UserByScreenName",
    features: &[
        ("highlights_tweets_tab_ui_enabled", true),
        ("hidden_profile_likes_enabled", true),
        ("creator_subscriptions_tweet_preview_api_enabled", true),
        ("hidden_profile_subscriptions_enabled", true),
        ("subscriptions_verification_info_verified_since_enabled", true),
        ("subscriptions_verification_info_is_identity_verified_enabled", false),
        ("responsive_web_twitter_article_notes_tab_enabled", false),
        ("subscriptions_feature_can_gift_premium", false),
        ("profile_label_improvements_pcf_label_in_post_enabled", false),
    ],
    variables: &[("withSafetyModeUserFields", true)],
    decode: decode_user_response,
};

/// Conversation around a single post, ancestors first
pub const TWEET_DETAIL: Operation<Vec<Post>> = Operation {
    id: "_8aYOgEDz35BrBcBal1-_w/TweetDetail",
    features: &[],
    variables: &[
        ("with_rux_injections", true),
        ("includePromotedContent", true),
        ("withCommunity", true),
        ("withQuickPromoteEligibilityTweetFields", true),
        ("withBirdwatchNotes", true),
        ("withVoice", true),
        ("withV2Timeline", true),
    ],
    decode: decode_conversation,
};

/// Posts liked by a user, newest first
pub const LIKES: Operation<Post> = Operation {
    id: "XHTMjDbiTGLQ9cP1em-aqQ/Likes",
    features: &[],
    variables: &[
        ("includePromotedContent", false),
        ("withClientEventToken", false),
        ("withBirdwatchNotes", false),
        ("withVoice", true),
    ],
    decode: decode_timeline_entry,
};

/// Profile lookups
#[derive(Debug, Clone, Copy)]
pub struct Users<'a> {
    client: &'a XClient,
}

impl<'a> Users<'a> {
    pub(crate) fn new(client: &'a XClient) -> Self {
        Self { client }
    }

    /// Look a profile up by handle, with or without the leading `@`
    ///
    /// Returns `Ok(None)` for unknown or unavailable accounts, and for a
    /// profile whose payload cannot be decoded.
    pub async fn get(&self, username: &str) -> XApiResult<Option<User>> {
        let handle = username.trim().trim_start_matches('@');
        if handle.is_empty() || !handle.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(XApiError::InvalidUsername {
                input: username.to_string(),
            });
        }

        let operation = USER_BY_SCREEN_NAME;
        let mut variables = Map::new();
        variables.insert("screen_name".to_string(), json!(handle));

        debug!(operation = operation.name(), handle, "looking up profile");

        let Some(data) = self
            .client
            .single_request(
                operation.id,
                operation.variables_with(variables),
                operation.features,
            )
            .await?
        else {
            return Ok(None);
        };

        match (operation.decode)(&data) {
            Ok(user) => Ok(user),
            Err(error) => {
                warn!(handle, %error, "could not decode profile, treating as absent");
                Ok(None)
            }
        }
    }
}

/// Single post lookups
#[derive(Debug, Clone, Copy)]
pub struct Posts<'a> {
    client: &'a XClient,
}

impl<'a> Posts<'a> {
    pub(crate) fn new(client: &'a XClient) -> Self {
        Self { client }
    }

    /// Fetch a post by bare id or permalink
    ///
    /// Input that is neither fails with [`XApiError::InvalidPostId`] before any
    /// request is sent. A response that cannot be decoded yields `Ok(None)`.
    pub async fn get(&self, id_or_url: &str) -> XApiResult<Option<Post>> {
        let post_id = PostId::parse(id_or_url)?;
        self.get_by_id(&post_id).await
    }

    /// Fetch a post by an already validated id
    pub async fn get_by_id(&self, post_id: &PostId) -> XApiResult<Option<Post>> {
        let operation = TWEET_DETAIL;
        let mut variables = Map::new();
        variables.insert("focalTweetId".to_string(), json!(post_id.as_str()));

        let Some(data) = self
            .client
            .single_request(
                operation.id,
                operation.variables_with(variables),
                operation.features,
            )
            .await?
        else {
            return Ok(None);
        };

        match (operation.decode)(&data) {
            Ok(posts) => {
                let focal = posts
                    .iter()
                    .position(|post| post.post_id == post_id.as_str())
                    .unwrap_or(0);
                Ok(posts.into_iter().nth(focal))
            }
            Err(error) => {
                warn!(%post_id, %error, "could not decode post, treating as absent");
                Ok(None)
            }
        }
    }
}

/// Liked-posts timelines
#[derive(Debug, Clone, Copy)]
pub struct Likes<'a> {
    client: &'a XClient,
}

impl<'a> Likes<'a> {
    pub(crate) fn new(client: &'a XClient) -> Self {
        Self { client }
    }

    /// Page through the posts a user liked
    ///
    /// `page_size` defaults to [`DEFAULT_LIKES_PAGE_SIZE`]. Malformed entries
    /// are skipped, see [`DecodedPages`].
    pub fn list(&self, user_id: u64, page_size: Option<u32>) -> DecodedPages<'a, Post> {
        self.list_limited(user_id, page_size, None)
    }

    /// Like [`Likes::list`], stopping after `limit` posts
    pub fn list_limited(
        &self,
        user_id: u64,
        page_size: Option<u32>,
        limit: Option<usize>,
    ) -> DecodedPages<'a, Post> {
        let operation = LIKES;
        let count = page_size.unwrap_or(DEFAULT_LIKES_PAGE_SIZE);

        let mut variables = Map::new();
        variables.insert("userId".to_string(), Value::String(user_id.to_string()));
        variables.insert("count".to_string(), json!(count));

        debug!(operation = operation.name(), user_id, count, limit, "listing likes");

        self.client
            .list_request(
                operation.id,
                operation.variables_with(variables),
                operation.features,
                limit,
            )
            .decoded(operation.decode)
    }
}
