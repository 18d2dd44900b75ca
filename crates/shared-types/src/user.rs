// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Profile snapshot

use serde::{Deserialize, Serialize};

/// A remote profile as seen at fetch time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Stable numeric identity
    pub user_id: u64,
    /// Handle, without the leading `@`; may change over time
    pub username: String,
    /// Free-form display name
    pub display_name: String,
    /// Profile picture URL
    pub avatar_url: String,
    /// Whether the profile carries the verification badge
    pub is_verified: bool,
}

impl User {
    /// Link to the profile page
    pub fn profile_url(&self) -> String {
        format!("https://x.com/{}", self.username)
    }
}
