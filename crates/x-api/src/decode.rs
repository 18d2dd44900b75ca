// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Entity decoders
//!
//! Turn raw GraphQL payloads into [`User`], [`Post`] and [`Media`] records. The
//! remote moves fields around between revisions (`legacy.screen_name` became
//! `core.screen_name`, avatars moved under `avatar`), so every field is read from
//! a list of alias paths, newest layout first.

use api_client::{DecodeError, find_key, lookup, lookup_any};
use chrono::{DateTime, Utc};
use serde_json::Value;
use shared_types::{Media, MediaType, Post, User};

/// Prefix the timeline puts in front of post ids in `entryId`
pub const POST_ENTRY_PREFIX: &str = "tweet-";

const CREATED_AT_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

/// Decode a user result object
pub fn decode_user(data: &Value) -> Result<User, DecodeError> {
    Ok(User {
        user_id: require_id(data, &[&["rest_id"], &["id_str"]], "rest_id")?,
        username: require_str(
            data,
            &[&["core", "screen_name"], &["legacy", "screen_name"]],
            "screen_name",
        )?
        .to_string(),
        display_name: require_str(data, &[&["core", "name"], &["legacy", "name"]], "name")?
            .to_string(),
        avatar_url: require_str(
            data,
            &[&["avatar", "image_url"], &["legacy", "profile_image_url_https"]],
            "avatar",
        )?
        .to_string(),
        is_verified: optional_bool(
            data,
            &[&["is_blue_verified"], &["verification", "verified"], &["legacy", "verified"]],
            "is_blue_verified",
        )?
        .unwrap_or(false),
    })
}

/// Decode a `UserByScreenName` response
///
/// An unknown handle comes back as `{"data": {}}` and a suspended one as a
/// `UserUnavailable` result; both decode to `None`.
pub fn decode_user_response(data: &Value) -> Result<Option<User>, DecodeError> {
    let result = lookup(data, &["data", "user", "result"]).or_else(|| find_key(data, "result"));

    match result {
        None | Some(Value::Null) => Ok(None),
        Some(result) if typename(result) == Some("UserUnavailable") => Ok(None),
        Some(result) => decode_user(result).map(Some),
    }
}

/// Decode a media entry from `extended_entities.media`
pub fn decode_media(data: &Value) -> Result<Media, DecodeError> {
    let type_name = require_str(data, &[&["type"]], "type")?;
    let media_type: MediaType = type_name
        .parse()
        .map_err(|e: shared_types::UnknownMediaType| DecodeError::invalid("type", e.to_string()))?;

    Ok(Media {
        media_id: require_id(data, &[&["id_str"], &["id"]], "id_str")?,
        media_key: require_str(data, &[&["media_key"]], "media_key")?.to_string(),
        url: require_str(data, &[&["media_url_https"], &["media_url"]], "media_url_https")?
            .to_string(),
        media_type,
        video_url: if media_type.is_photo() {
            None
        } else {
            best_mp4_variant(data)
        },
    })
}

/// Decode a post result object
///
/// The id comes from `rest_id`, or from a timeline `entryId` with its `tweet-`
/// prefix removed. Fails when the author cannot be resolved.
pub fn decode_post(data: &Value) -> Result<Post, DecodeError> {
    decode_post_with_fallback_id(data, None)
}

/// Decode a timeline entry wrapping a post
///
/// Entries nest the post under `content.itemContent.tweet_results.result`; older
/// payloads inline the post fields next to `entryId`.
pub fn decode_timeline_entry(entry: &Value) -> Result<Post, DecodeError> {
    let entry_id = entry.get("entryId").and_then(Value::as_str);

    match find_key(entry, "tweet_results").and_then(|results| results.get("result")) {
        Some(result) => decode_post_with_fallback_id(result, entry_id),
        None => decode_post(entry),
    }
}

/// Decode a `TweetDetail` response without knowing which post was asked for
///
/// Takes the first post entry of the conversation, or the single `tweetResult`
/// of the by-id query.
pub fn decode_post_response(data: &Value) -> Result<Post, DecodeError> {
    if let Some(Value::Array(entries)) = find_key(data, "entries")
        && let Some(entry) = entries.iter().find(|entry| is_post_entry(entry))
    {
        return decode_timeline_entry(entry);
    }

    let result = lookup_any(
        data,
        &[&["data", "tweetResult", "result"], &["data", "tweet_result", "result"]],
    )
    .or_else(|| find_key(data, "tweet_results").and_then(|results| results.get("result")))
    .ok_or_else(|| DecodeError::missing("tweet_results.result"))?;

    decode_post(result)
}

/// Decode every post of a `TweetDetail` conversation, in order
///
/// Undecodable entries are left out so a broken reply cannot hide the post
/// that was asked for. Fails only when no post decodes at all, with the first
/// entry's error.
pub fn decode_conversation(data: &Value) -> Result<Vec<Post>, DecodeError> {
    let mut posts = Vec::new();
    let mut first_error = None;

    if let Some(Value::Array(entries)) = find_key(data, "entries") {
        for entry in entries.iter().filter(|entry| is_post_entry(entry)) {
            match decode_timeline_entry(entry) {
                Ok(post) => posts.push(post),
                Err(error) => {
                    first_error.get_or_insert(error);
                }
            }
        }
    }

    if !posts.is_empty() {
        return Ok(posts);
    }

    match first_error {
        Some(error) => Err(error),
        None => decode_post_response(data).map(|post| vec![post]),
    }
}

fn decode_post_with_fallback_id(
    data: &Value,
    fallback_id: Option<&str>,
) -> Result<Post, DecodeError> {
    let data = unwrap_visibility(data);

    let raw_id = lookup_any(data, &[&["rest_id"], &["entryId"]])
        .and_then(Value::as_str)
        .or(fallback_id)
        .ok_or_else(|| DecodeError::missing("rest_id"))?;
    let post_id = raw_id.strip_prefix(POST_ENTRY_PREFIX).unwrap_or(raw_id);
    if post_id.is_empty() || !post_id.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DecodeError::invalid("rest_id", format!("not a post id: {raw_id}")));
    }

    let author = lookup(data, &["core", "user_results", "result"])
        .filter(|author| !author.is_null())
        .ok_or_else(|| DecodeError::missing("core.user_results.result"))?;

    let media = match lookup_any(
        data,
        &[&["legacy", "extended_entities", "media"], &["legacy", "entities", "media"]],
    ) {
        Some(Value::Array(items)) => items.iter().map(decode_media).collect::<Result<Vec<_>, _>>()?,
        Some(_) => return Err(DecodeError::invalid("extended_entities.media", "not an array")),
        None => Vec::new(),
    };

    let text = lookup_any(
        data,
        &[&["note_tweet", "note_tweet_results", "result", "text"], &["legacy", "full_text"]],
    )
    .and_then(Value::as_str)
    .map(str::to_string);

    let created_at = match lookup(data, &["legacy", "created_at"]).and_then(Value::as_str) {
        Some(raw) => Some(parse_created_at(raw)?),
        None => None,
    };

    Ok(Post {
        post_id: post_id.to_string(),
        author: decode_user(unwrap_visibility(author))?,
        media,
        text,
        created_at,
    })
}

fn parse_created_at(raw: &str) -> Result<DateTime<Utc>, DecodeError> {
    DateTime::parse_from_str(raw, CREATED_AT_FORMAT)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|e| DecodeError::invalid("created_at", format!("{raw}: {e}")))
}

fn is_post_entry(entry: &Value) -> bool {
    entry
        .get("entryId")
        .and_then(Value::as_str)
        .is_some_and(|id| id.starts_with(POST_ENTRY_PREFIX))
}

fn typename(data: &Value) -> Option<&str> {
    data.get("__typename").and_then(Value::as_str)
}

// Posts with limited visibility wrap the real object one level down
fn unwrap_visibility(data: &Value) -> &Value {
    match (typename(data), data.get("tweet")) {
        (Some("TweetWithVisibilityResults"), Some(inner)) => inner,
        _ => data,
    }
}

fn best_mp4_variant(data: &Value) -> Option<String> {
    let Some(Value::Array(variants)) = lookup(data, &["video_info", "variants"]) else {
        return None;
    };

    variants
        .iter()
        .filter(|variant| {
            variant.get("content_type").and_then(Value::as_str) == Some("video/mp4")
        })
        .filter_map(|variant| {
            let url = variant.get("url").and_then(Value::as_str)?;
            let bitrate = variant.get("bitrate").and_then(Value::as_u64).unwrap_or(0);
            Some((bitrate, url))
        })
        .max_by_key(|(bitrate, _)| *bitrate)
        .map(|(_, url)| url.to_string())
}

fn require_str<'a>(
    data: &'a Value,
    paths: &[&[&str]],
    field: &str,
) -> Result<&'a str, DecodeError> {
    match lookup_any(data, paths) {
        Some(Value::String(value)) => Ok(value),
        Some(other) => Err(DecodeError::invalid(field, format!("expected a string, got {other}"))),
        None => Err(DecodeError::missing(field)),
    }
}

fn require_id(data: &Value, paths: &[&[&str]], field: &str) -> Result<u64, DecodeError> {
    match lookup_any(data, paths) {
        Some(Value::String(value)) => value
            .parse()
            .map_err(|_| DecodeError::invalid(field, format!("not a numeric id: {value}"))),
        Some(Value::Number(value)) => value
            .as_u64()
            .ok_or_else(|| DecodeError::invalid(field, format!("not a numeric id: {value}"))),
        Some(other) => Err(DecodeError::invalid(field, format!("not a numeric id: {other}"))),
        None => Err(DecodeError::missing(field)),
    }
}

fn optional_bool(
    data: &Value,
    paths: &[&[&str]],
    field: &str,
) -> Result<Option<bool>, DecodeError> {
    match lookup_any(data, paths) {
        Some(Value::Bool(value)) => Ok(Some(*value)),
        Some(other) => Err(DecodeError::invalid(field, format!("expected a bool, got {other}"))),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn legacy_user() -> Value {
        json!({
            "__typename": "User",
            "rest_id": "783214",
            "is_blue_verified": true,
            "legacy": {
                "name": "Some User",
                "screen_name": "someuser",
                "profile_image_url_https": "https://pbs.twimg.com/profile_images/1/old.jpg"
            }
        })
    }

    fn current_user() -> Value {
        json!({
            "__typename": "User",
            "rest_id": "783214",
            "is_blue_verified": false,
            "core": {"name": "Some User", "screen_name": "someuser"},
            "avatar": {"image_url": "https://pbs.twimg.com/profile_images/1/new.jpg"},
            "legacy": {}
        })
    }

    fn photo() -> Value {
        json!({
            "id_str": "1555",
            "media_key": "3_1555",
            "media_url_https": "https://pbs.twimg.com/media/abc.jpg",
            "type": "photo"
        })
    }

    fn video() -> Value {
        json!({
            "id_str": "1556",
            "media_key": "7_1556",
            "media_url_https": "https://pbs.twimg.com/ext_tw_video_thumb/1556/pu/img/x.jpg",
            "type": "video",
            "video_info": {
                "variants": [
                    {"content_type": "application/x-mpegURL", "url": "https://video.twimg.com/pl.m3u8"},
                    {"bitrate": 256000, "content_type": "video/mp4", "url": "https://video.twimg.com/low.mp4"},
                    {"bitrate": 2176000, "content_type": "video/mp4", "url": "https://video.twimg.com/high.mp4"}
                ]
            }
        })
    }

    fn post_result(id: &str) -> Value {
        json!({
            "__typename": "Tweet",
            "rest_id": id,
            "core": {"user_results": {"result": current_user()}},
            "legacy": {
                "created_at": "Wed Oct 10 20:19:24 +0000 2018",
                "full_text": "hello #tag https://t.co/x",
                "extended_entities": {"media": [photo(), video()]}
            }
        })
    }

    #[test]
    fn decodes_legacy_user_layout() {
        let user = decode_user(&legacy_user()).unwrap();

        assert_eq!(user.user_id, 783_214);
        assert_eq!(user.username, "someuser");
        assert_eq!(user.display_name, "Some User");
        assert_eq!(user.avatar_url, "https://pbs.twimg.com/profile_images/1/old.jpg");
        assert!(user.is_verified);
    }

    #[test]
    fn decodes_current_user_layout() {
        let user = decode_user(&current_user()).unwrap();

        assert_eq!(user.username, "someuser");
        assert_eq!(user.avatar_url, "https://pbs.twimg.com/profile_images/1/new.jpg");
        assert!(!user.is_verified);
    }

    #[test]
    fn user_without_handle_fails() {
        let mut user = legacy_user();
        user["legacy"]
            .as_object_mut()
            .unwrap()
            .remove("screen_name");

        assert_eq!(
            decode_user(&user),
            Err(DecodeError::missing("screen_name"))
        );
    }

    #[test]
    fn user_response_handles_missing_and_unavailable() {
        let found = json!({"data": {"user": {"result": legacy_user()}}});
        assert_eq!(
            decode_user_response(&found).unwrap().map(|user| user.user_id),
            Some(783_214)
        );

        assert_eq!(decode_user_response(&json!({"data": {}})), Ok(None));

        let unavailable = json!({"data": {"user": {"result": {"__typename": "UserUnavailable"}}}});
        assert_eq!(decode_user_response(&unavailable), Ok(None));
    }

    #[test]
    fn decodes_photo_and_video_media() {
        let photo = decode_media(&photo()).unwrap();
        assert_eq!(photo.media_id, 1555);
        assert_eq!(photo.media_type, MediaType::Photo);
        assert_eq!(photo.video_url, None);

        let video = decode_media(&video()).unwrap();
        assert_eq!(video.media_type, MediaType::Video);
        assert_eq!(
            video.video_url.as_deref(),
            Some("https://video.twimg.com/high.mp4")
        );
    }

    #[test]
    fn unknown_media_type_is_invalid() {
        let mut media = photo();
        media["type"] = json!("sticker");

        assert!(matches!(
            decode_media(&media),
            Err(DecodeError::InvalidField { field, .. }) if field == "type"
        ));
    }

    #[test]
    fn post_entry_id_prefix_is_stripped() {
        let entry = json!({
            "entryId": "tweet-12345",
            "core": {"user_results": {"result": legacy_user()}}
        });

        let post = decode_post(&entry).unwrap();

        assert_eq!(post.post_id, "12345");
        assert!(post.media.is_empty());
        assert_eq!(post.url(), "https://x.com/someuser/status/12345");
    }

    #[test]
    fn post_without_author_fails() {
        let entry = json!({"entryId": "tweet-12345", "legacy": {}});

        assert_eq!(
            decode_post(&entry),
            Err(DecodeError::missing("core.user_results.result"))
        );
    }

    #[test]
    fn decodes_full_post_result() {
        let post = decode_post(&post_result("1850000000000000001")).unwrap();

        assert_eq!(post.post_id, "1850000000000000001");
        assert_eq!(post.author.username, "someuser");
        assert_eq!(post.media.len(), 2);
        assert_eq!(post.photos().count(), 1);
        assert_eq!(post.text.as_deref(), Some("hello #tag https://t.co/x"));
        assert_eq!(
            post.created_at.map(|t| t.to_rfc3339()),
            Some("2018-10-10T20:19:24+00:00".to_string())
        );
    }

    #[test]
    fn unwraps_visibility_wrapper() {
        let wrapped = json!({
            "__typename": "TweetWithVisibilityResults",
            "tweet": post_result("77")
        });

        assert_eq!(decode_post(&wrapped).unwrap().post_id, "77");
    }

    #[test]
    fn timeline_entry_uses_nested_result() {
        let entry = json!({
            "entryId": "tweet-88",
            "sortIndex": "1",
            "content": {
                "entryType": "TimelineTimelineItem",
                "itemContent": {"tweet_results": {"result": post_result("88")}}
            }
        });

        let post = decode_timeline_entry(&entry).unwrap();

        assert_eq!(post.post_id, "88");
        assert_eq!(post.author.user_id, 783_214);
    }

    #[test]
    fn timeline_entry_falls_back_to_entry_id() {
        let mut result = post_result("0");
        result.as_object_mut().unwrap().remove("rest_id");
        let entry = json!({
            "entryId": "tweet-99",
            "content": {"itemContent": {"tweet_results": {"result": result}}}
        });

        assert_eq!(decode_timeline_entry(&entry).unwrap().post_id, "99");
    }

    #[test]
    fn conversation_keeps_entry_order() {
        let conversation = json!({
            "data": {"threaded_conversation_with_injections_v2": {"instructions": [{
                "type": "TimelineAddEntries",
                "entries": [
                    {"entryId": "tweet-1", "content": {"itemContent": {"tweet_results": {"result": post_result("1")}}}},
                    {"entryId": "tweet-2", "content": {"itemContent": {"tweet_results": {"result": post_result("2")}}}},
                    {"entryId": "cursor-bottom-0", "content": {"value": "C"}}
                ]
            }]}}
        });

        let ids: Vec<String> = decode_conversation(&conversation)
            .unwrap()
            .into_iter()
            .map(|post| post.post_id)
            .collect();

        assert_eq!(ids, vec!["1", "2"]);
        assert_eq!(decode_post_response(&conversation).unwrap().post_id, "1");
    }

    #[test]
    fn conversation_skips_broken_entries() {
        let conversation = json!({"entries": [
            {"entryId": "tweet-1", "content": {"itemContent": {"tweet_results": {"result": {"rest_id": "1"}}}}},
            {"entryId": "tweet-2", "content": {"itemContent": {"tweet_results": {"result": post_result("2")}}}}
        ]});
        let broken = json!({"entries": [
            {"entryId": "tweet-1", "content": {"itemContent": {"tweet_results": {"result": {"rest_id": "1"}}}}}
        ]});

        assert_eq!(decode_conversation(&conversation).unwrap()[0].post_id, "2");
        assert_eq!(
            decode_conversation(&broken),
            Err(DecodeError::missing("core.user_results.result"))
        );
    }

    #[test]
    fn post_response_reads_by_id_layout() {
        let response = json!({"data": {"tweetResult": {"result": post_result("5")}}});

        assert_eq!(decode_post_response(&response).unwrap().post_id, "5");
        assert_eq!(
            decode_post_response(&json!({"data": {}})),
            Err(DecodeError::missing("tweet_results.result"))
        );
    }

    #[test]
    fn malformed_created_at_is_invalid() {
        let mut result = post_result("6");
        result["legacy"]["created_at"] = json!("yesterday");

        assert!(matches!(
            decode_post(&result),
            Err(DecodeError::InvalidField { field, .. }) if field == "created_at"
        ));
    }
}
