// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Shared record types for the birder workspace
//!
//! These are plain value objects: each one is a snapshot of a remote entity at
//! fetch time, built fresh from an API response and owned by the caller.

pub mod post;
pub mod user;

pub use post::{Media, MediaType, Post, UnknownMediaType};
pub use user::User;
