// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0
#![allow(missing_docs, dead_code)]

//! Response fixtures shaped like the X GraphQL API

use serde_json::{Value, json};
use wiremock::Request;
use x_api::{CookieJar, XApiConfig, XClient};

pub const TEST_CSRF_TOKEN: &str = "test-csrf-token";
pub const USER_ID: u64 = 783_214;

/// Client pointed at a mock server
pub fn test_client(base_url: &str) -> XClient {
    let cookies: CookieJar = [("ct0", TEST_CSRF_TOKEN), ("auth_token", "test-auth-token")]
        .into_iter()
        .collect();
    let config = XApiConfig::new(cookies)
        .with_base_url(base_url)
        .unwrap()
        .with_timeout_seconds(5);

    XClient::new(config).unwrap()
}

/// Decoded `variables` query parameter of a recorded request
pub fn variables_of(request: &Request) -> Value {
    json_param(request, "variables")
}

/// Decoded `features` query parameter of a recorded request
pub fn features_of(request: &Request) -> Value {
    json_param(request, "features")
}

fn json_param(request: &Request, name: &str) -> Value {
    request
        .url
        .query_pairs()
        .find(|(key, _)| key == name)
        .and_then(|(_, value)| serde_json::from_str(&value).ok())
        .unwrap_or(Value::Null)
}

/// Matcher: the request carries no pagination cursor
pub fn without_cursor(request: &Request) -> bool {
    variables_of(request).get("cursor").is_none()
}

/// Matcher factory: the request carries the given cursor
pub fn with_cursor(cursor: &'static str) -> impl Fn(&Request) -> bool + Send + Sync {
    move |request: &Request| variables_of(request).get("cursor") == Some(&json!(cursor))
}

pub fn user_result() -> Value {
    json!({
        "__typename": "User",
        "rest_id": USER_ID.to_string(),
        "is_blue_verified": true,
        "core": {"name": "Some User", "screen_name": "someuser"},
        "avatar": {"image_url": "https://pbs.twimg.com/profile_images/1/a_normal.jpg"},
        "legacy": {"followers_count": 10}
    })
}

pub fn user_response() -> Value {
    json!({"data": {"user": {"result": user_result()}}})
}

pub fn post_result(post_id: &str) -> Value {
    json!({
        "__typename": "Tweet",
        "rest_id": post_id,
        "core": {"user_results": {"result": user_result()}},
        "legacy": {
            "created_at": "Wed Oct 10 20:19:24 +0000 2018",
            "full_text": format!("post {post_id}"),
            "extended_entities": {"media": [{
                "id_str": "1555",
                "media_key": "3_1555",
                "media_url_https": "https://pbs.twimg.com/media/abc.jpg",
                "type": "photo"
            }]}
        }
    })
}

pub fn post_entry(post_id: &str) -> Value {
    json!({
        "entryId": format!("tweet-{post_id}"),
        "sortIndex": post_id,
        "content": {
            "entryType": "TimelineTimelineItem",
            "itemContent": {
                "itemType": "TimelineTweet",
                "tweet_results": {"result": post_result(post_id)}
            }
        }
    })
}

pub fn cursor_entry(position: &str, value: &str) -> Value {
    json!({
        "entryId": format!("cursor-{position}-0"),
        "sortIndex": "0",
        "content": {"entryType": "TimelineTimelineCursor", "value": value, "cursorType": "Bottom"}
    })
}

/// One page of a likes timeline
pub fn likes_page(mut entries: Vec<Value>, bottom_cursor: Option<&str>) -> Value {
    entries.push(cursor_entry("top", "TOP"));
    if let Some(cursor) = bottom_cursor {
        entries.push(cursor_entry("bottom", cursor));
    }

    json!({
        "data": {"user": {"result": {"timeline_v2": {"timeline": {"instructions": [
            {"type": "TimelineClearCache"},
            {"type": "TimelineAddEntries", "entries": entries}
        ]}}}}}
    })
}

/// `TweetDetail` conversation with the given posts, in order
pub fn conversation(post_ids: &[&str]) -> Value {
    let mut entries: Vec<Value> = post_ids.iter().map(|id| post_entry(id)).collect();
    entries.push(cursor_entry("bottom", "MORE_REPLIES"));

    json!({
        "data": {"threaded_conversation_with_injections_v2": {"instructions": [
            {"type": "TimelineAddEntries", "entries": entries}
        ]}}
    })
}
