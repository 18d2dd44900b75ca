// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Message dispatch
//!
//! Every incoming message is parsed into a [`Command`], resolved through the
//! X client facades and answered with exactly one [`Reply`]. Failures become an
//! [`Reply::Error`] so a bad message never stops the runtime.

use serde::Serialize;
use shared_types::{Post, User};
use tracing::{debug, error, info, warn};
use x_api::{
    PostId, XApiError, XApiResult, XClient,
    links::{cleanup_text, contains_post_link, find_post_links, post_url},
};

use crate::config::{BirderConfig, PageSize};

/// Usage text sent for `/help` and unrecognised messages
pub const USAGE: &str = "Usage: /img <post link>, /user <handle>, /likes <handle> [limit]";

/// Posts returned by `/likes` when neither the message nor the config sets a limit
pub const DEFAULT_LIKES_LIMIT: usize = 20;

/// A parsed incoming message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Resolve a single post
    Post(PostId),
    /// Look a profile up
    User(String),
    /// List the posts a user liked
    Likes {
        /// Handle without the leading `@`
        username: String,
        /// Maximum number of posts, when given
        limit: Option<usize>,
    },
    /// Explicit `/help`, or a known command missing its argument
    Help,
    /// Anything else
    Unknown,
}

impl Command {
    /// Parse a message
    ///
    /// Commands may carry a bot suffix (`/img@birder_bot`). Plain text is a
    /// [`Command::Post`] when it contains a post link.
    pub fn parse(text: &str) -> Self {
        let text = text.trim();

        let Some(rest) = text.strip_prefix('/') else {
            if !contains_post_link(text) {
                return Self::Unknown;
            }
            return find_post_links(text)
                .into_iter()
                .next()
                .map_or(Self::Unknown, Self::Post);
        };

        let mut words = rest.split_whitespace();
        let name = words
            .next()
            .and_then(|word| word.split('@').next())
            .unwrap_or_default()
            .to_lowercase();

        match (name.as_str(), words.next()) {
            ("img" | "i", Some(link)) => PostId::parse(link)
                .ok()
                .or_else(|| find_post_links(link).into_iter().next())
                .map_or(Self::Help, Self::Post),
            ("user" | "u", Some(handle)) => Self::User(handle.trim_start_matches('@').to_string()),
            ("likes", Some(handle)) => {
                let username = handle.trim_start_matches('@').to_string();
                match words.next().map(str::parse::<usize>) {
                    None => Self::Likes {
                        username,
                        limit: None,
                    },
                    Some(Ok(limit)) => Self::Likes {
                        username,
                        limit: Some(limit),
                    },
                    Some(Err(_)) => Self::Help,
                }
            }
            ("img" | "i" | "user" | "u" | "likes", None) | ("help" | "start", _) => Self::Help,
            _ => Self::Unknown,
        }
    }
}

/// Answer to one message, serialized as a single JSON object
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Reply {
    /// A resolved post with its downloadable media
    Post {
        /// Canonical permalink
        url: String,
        /// Post text without hashtags and links
        caption: Option<String>,
        /// Large photo URLs
        photos: Vec<String>,
        /// Best video URLs
        videos: Vec<String>,
        /// The decoded post
        post: Post,
    },
    /// A resolved profile
    User {
        /// Link to the profile page
        profile_url: String,
        /// The decoded profile
        user: User,
    },
    /// Posts a user liked, newest first
    Likes {
        /// Whose likes these are
        user: User,
        /// The liked posts
        posts: Vec<Post>,
    },
    /// Nothing exists behind the query
    NotFound {
        /// What was looked up
        query: String,
    },
    /// The request failed
    Error {
        /// Human-readable failure
        message: String,
    },
    /// Usage help
    Help {
        /// Usage text
        usage: &'static str,
    },
}

impl Reply {
    fn for_post(post: Post) -> Self {
        let caption = post
            .text
            .as_deref()
            .map(cleanup_text)
            .filter(|caption| !caption.is_empty());

        Self::Post {
            url: post.url(),
            caption,
            photos: post.media.iter().filter_map(|media| media.large_url()).collect(),
            videos: post
                .media
                .iter()
                .filter_map(|media| media.video_url.clone())
                .collect(),
            post,
        }
    }

    fn for_user(user: User) -> Self {
        Self::User {
            profile_url: user.profile_url(),
            user,
        }
    }

    fn not_found(query: impl Into<String>) -> Self {
        Self::NotFound {
            query: query.into(),
        }
    }

    fn help() -> Self {
        Self::Help { usage: USAGE }
    }
}

/// Resolves messages against the X API
#[derive(Debug, Clone)]
pub struct Dispatcher {
    client: XClient,
    likes_page_size: PageSize,
    likes_limit: usize,
}

impl Dispatcher {
    /// Create a dispatcher with default likes settings
    pub fn new(client: XClient) -> Self {
        Self {
            client,
            likes_page_size: PageSize::default(),
            likes_limit: DEFAULT_LIKES_LIMIT,
        }
    }

    /// Create a dispatcher using the configured likes settings
    pub fn from_config(client: XClient, config: &BirderConfig) -> Self {
        Self::new(client).with_likes_settings(config.likes_page_size, config.likes_limit)
    }

    /// Override the likes page size and default limit
    #[must_use]
    pub fn with_likes_settings(mut self, page_size: PageSize, limit: usize) -> Self {
        self.likes_page_size = page_size;
        self.likes_limit = limit;
        self
    }

    /// Answer one message
    pub async fn handle(&self, text: &str) -> Reply {
        let command = Command::parse(text);
        debug!(?command, "Dispatching message");

        match self.execute(&command).await {
            Ok(reply) => reply,
            Err(err) => {
                if err.is_validation() {
                    warn!(?command, error = %err, "Rejected message");
                } else {
                    error!(?command, error = %err, status = ?err.status(), "Command failed");
                }
                err.into()
            }
        }
    }

    async fn execute(&self, command: &Command) -> XApiResult<Reply> {
        match command {
            Command::Post(post_id) => {
                let Some(post) = self.client.posts().get_by_id(post_id).await? else {
                    return Ok(Reply::not_found(post_url(post_id, None)));
                };
                info!(
                    %post_id,
                    media = post.media.len(),
                    has_video = post.has_video(),
                    "Resolved post"
                );
                Ok(Reply::for_post(post))
            }
            Command::User(username) => Ok(self
                .client
                .users()
                .get(username)
                .await?
                .map_or_else(|| Reply::not_found(username.as_str()), Reply::for_user)),
            Command::Likes { username, limit } => self.likes(username, *limit).await,
            Command::Help | Command::Unknown => Ok(Reply::help()),
        }
    }

    async fn likes(&self, username: &str, limit: Option<usize>) -> XApiResult<Reply> {
        let Some(user) = self.client.users().get(username).await? else {
            return Ok(Reply::not_found(username));
        };

        let limit = limit.unwrap_or(self.likes_limit);
        let posts = self
            .client
            .likes()
            .list_limited(user.user_id, Some(self.likes_page_size.value()), Some(limit))
            .collect_all()
            .await?;

        info!(username, user_id = user.user_id, count = posts.len(), "Collected likes");

        Ok(Reply::Likes { user, posts })
    }
}

impl From<XApiError> for Reply {
    fn from(error: XApiError) -> Self {
        Reply::Error {
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post_id(id: &str) -> PostId {
        PostId::parse(id).unwrap()
    }

    #[test]
    fn parses_img_command() {
        assert_eq!(
            Command::parse("/img https://x.com/someuser/status/98765"),
            Command::Post(post_id("98765"))
        );
        assert_eq!(
            Command::parse("/i@birder_bot https://twitter.com/someuser/status/1?s=20"),
            Command::Post(post_id("1"))
        );
        assert_eq!(Command::parse("/img 12345"), Command::Post(post_id("12345")));
        assert_eq!(Command::parse("/img"), Command::Help);
        assert_eq!(Command::parse("/img not-a-link"), Command::Help);
    }

    #[test]
    fn plain_text_with_link_is_a_post() {
        assert_eq!(
            Command::parse("look at this https://fxtwitter.com/someuser/status/42 lol"),
            Command::Post(post_id("42"))
        );
        assert_eq!(Command::parse("just chatting"), Command::Unknown);
        assert_eq!(Command::parse(""), Command::Unknown);
    }

    #[test]
    fn parses_user_and_likes() {
        assert_eq!(
            Command::parse("/user @someuser"),
            Command::User("someuser".to_string())
        );
        assert_eq!(
            Command::parse("/likes someuser"),
            Command::Likes {
                username: "someuser".to_string(),
                limit: None
            }
        );
        assert_eq!(
            Command::parse("/LIKES @someuser 5"),
            Command::Likes {
                username: "someuser".to_string(),
                limit: Some(5)
            }
        );
        assert_eq!(Command::parse("/likes someuser many"), Command::Help);
        assert_eq!(Command::parse("/user"), Command::Help);
    }

    #[test]
    fn parses_help_and_unknown_commands() {
        assert_eq!(Command::parse("/help"), Command::Help);
        assert_eq!(Command::parse("/start"), Command::Help);
        assert_eq!(Command::parse("/frobnicate now"), Command::Unknown);
    }

    #[test]
    fn replies_are_tagged() {
        let reply = serde_json::to_value(Reply::not_found("nobody")).unwrap();
        assert_eq!(reply["kind"], "not_found");
        assert_eq!(reply["query"], "nobody");

        let reply = serde_json::to_value(Reply::help()).unwrap();
        assert_eq!(reply["kind"], "help");
        assert_eq!(reply["usage"], USAGE);
    }

    #[test]
    fn user_reply_links_the_profile() {
        let user = User {
            user_id: 783_214,
            username: "someuser".to_string(),
            display_name: "Some User".to_string(),
            avatar_url: "https://pbs.twimg.com/profile_images/1/a.jpg".to_string(),
            is_verified: false,
        };

        let reply = serde_json::to_value(Reply::for_user(user)).unwrap();

        assert_eq!(reply["kind"], "user");
        assert_eq!(reply["profile_url"], "https://x.com/someuser");
        assert_eq!(reply["user"]["user_id"], 783_214);
    }

    #[test]
    fn client_errors_become_error_replies() {
        let reply = Reply::from(XApiError::Api {
            status: 500,
            body: "boom".to_string(),
        });

        assert_eq!(
            reply,
            Reply::Error {
                message: "Unexpected error from X API: 500 boom".to_string()
            }
        );
    }
}
