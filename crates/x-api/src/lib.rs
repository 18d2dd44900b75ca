// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Unofficial client for the X internal GraphQL API
//!
//! The web client talks to a family of persisted GraphQL queries over plain
//! `GET`. This crate speaks the same protocol with a logged-in session's
//! cookies, and shapes the deeply nested responses into flat records.
//!
//! # Architecture
//!
//! - **Client**: [`XClient`] - authentication headers, single and paged requests
//! - **Pagination**: [`Pages`] / [`DecodedPages`] - pull-based cursor state machine
//! - **Facades**: [`Users`], [`Posts`], [`Likes`] - one remote query each
//! - **Decoders**: [`decode`] - tolerant of historical response layouts
//! - **Inputs**: [`PostId`], [`CookieJar`] - validated before any request
//!
//! # Example
//!
//! ```no_run
//! use x_api::{CookieJar, XApiConfig, XClient};
//!
//! # async fn run() -> Result<(), x_api::XApiError> {
//! let cookies = CookieJar::decode(r#"{"ct0": "...", "auth_token": "..."}"#)?;
//! let client = XClient::new(XApiConfig::new(cookies))?;
//!
//! if let Some(post) = client.posts().get("https://x.com/someuser/status/98765").await? {
//!     for photo in post.photos() {
//!         println!("{:?}", photo.large_url());
//!     }
//! }
//!
//! let mut likes = client.likes().list(783_214, None);
//! while let Some(page) = likes.next_page().await? {
//!     println!("{} liked posts", page.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod cookies;
pub mod decode;
pub mod endpoints;
pub mod error;
pub mod features;
pub mod links;
pub mod pages;

pub use client::XClient;
pub use config::XApiConfig;
pub use cookies::CookieJar;
pub use endpoints::{Likes, Posts, Users};
pub use error::{XApiError, XApiResult};
pub use links::PostId;
pub use pages::{DecodedPages, Pages};
pub use shared_types::{Media, MediaType, Post, User};
