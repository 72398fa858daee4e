//! Reshaping of Reddit JSON exports into stored posts.
//!
//! Two export layouts are understood:
//!
//! - a flat array of post objects, each carrying its raw `comments` children;
//!   these are normalised into [`ProcessedPost`] with every comment reply
//!   tree flattened into [`ProcessedComment`]s
//! - the listing layout returned by Reddit's `.json` endpoints, where a post
//!   listing is followed by its comments listing; these are stored as
//!   `{ "post": ..., "comments": ... }` without further reshaping
//!
//! Missing fields never reject a comment. Only a post without a usable `id`
//! is dropped.

use chrono::{DateTime, Utc};
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::domain::entities::RedditPost;
use crate::domain::value_objects::{ProcessedComment, ProcessedPost};

const COMMENT_KIND: &str = "t1";
const NOT_AVAILABLE: &str = "N/A";

pub fn extract_comments(raw: Option<&Value>) -> Vec<ProcessedComment> {
    let Some(children) = raw.and_then(Value::as_array) else {
        return Vec::new();
    };

    children.iter().filter_map(process_comment).collect()
}

fn process_comment(raw: &Value) -> Option<ProcessedComment> {
    if raw.get("kind").and_then(Value::as_str) != Some(COMMENT_KIND) {
        return None;
    }
    let data = raw.get("data").filter(|data| data.is_object())?;

    // `replies` is an empty string when a comment has none
    let nested = data
        .get("replies")
        .filter(|replies| replies.is_object())
        .and_then(|replies| replies.pointer("/data/children"));

    Some(ProcessedComment {
        comment_id: string_field(data, "id")
            .map(str::to_string)
            .unwrap_or_else(|| format!("unknown_{}", Uuid::new_v4())),
        comment_text: string_field(data, "body").unwrap_or_default().to_string(),
        comment_author: string_field(data, "author")
            .unwrap_or(NOT_AVAILABLE)
            .to_string(),
        comment_created_at: number_field(data, "created_utc").unwrap_or(0.0),
        comment_likes: integer_field(data, "score").unwrap_or(0),
        replies: extract_comments(nested),
    })
}

/// Normalises one element of a flat export. Returns `None` for anything
/// that is not an object with a non-empty string `id`.
pub fn process_single_post(raw: &Value) -> Option<RedditPost> {
    let Some(post_id) = raw
        .as_object()
        .and_then(|object| object.get("id"))
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
    else {
        tracing::warn!("Skipping invalid post data: {}", preview(raw));
        return None;
    };

    let created_utc = number_field(raw, "created_utc");
    let author = string_field(raw, "author").unwrap_or(NOT_AVAILABLE);

    let processed = ProcessedPost {
        post_title: string_field(raw, "title").unwrap_or(NOT_AVAILABLE).to_string(),
        post_url: string_field(raw, "url").unwrap_or_default().to_string(),
        post_description: string_field(raw, "selftext").map(str::to_string),
        post_author: author.to_string(),
        post_created_at: created_utc.unwrap_or(0.0),
        post_likes: integer_field(raw, "score").unwrap_or(0),
        post_comment_count: integer_field(raw, "num_comments").unwrap_or(0),
        comments: extract_comments(raw.get("comments")),
    };

    let data = match serde_json::to_value(&processed) {
        Ok(data) => data,
        Err(e) => {
            tracing::error!("Error processing post ID {}: {}", post_id, e);
            return None;
        }
    };

    Some(RedditPost::new(
        post_id.to_string(),
        created_at_from_epoch(created_utc),
        author.to_string(),
        data,
    ))
}

/// Normalises a whole flat export, keeping input order and dropping
/// invalid elements.
pub fn normalize_export(raw_posts: &[Value]) -> Vec<RedditPost> {
    raw_posts
        .par_iter()
        .filter_map(process_single_post)
        .collect()
}

/// Builds a stored post from a post listing and the comments listing that
/// follows it. Returns `None` when the listing carries no post with an id.
pub fn from_listing_pair(post_listing: &Value, comments_listing: Option<&Value>) -> Option<RedditPost> {
    let post = post_listing
        .pointer("/data/children/0/data")
        .filter(|post| post.is_object())?;
    let post_id = string_field(post, "id").filter(|id| !id.is_empty())?;

    let comments = comments_listing
        .and_then(|listing| listing.pointer("/data/children"))
        .cloned()
        .unwrap_or_else(|| json!([]));

    Some(RedditPost::new(
        post_id.to_string(),
        created_at_from_epoch(number_field(post, "created_utc")),
        string_field(post, "author")
            .unwrap_or(NOT_AVAILABLE)
            .to_string(),
        json!({ "post": post, "comments": comments }),
    ))
}

#[derive(Debug, Clone, Copy)]
pub struct ListingPair<'a> {
    pub index: usize,
    pub post_listing: &'a Value,
    pub comments_listing: Option<&'a Value>,
}

/// Walks a listing export two elements at a time: `[post, comments, post, comments, ...]`.
pub fn pair_listings(values: &[Value]) -> impl Iterator<Item = ListingPair<'_>> {
    values
        .chunks(2)
        .enumerate()
        .map(|(chunk_index, chunk)| ListingPair {
            index: chunk_index * 2,
            post_listing: &chunk[0],
            comments_listing: chunk.get(1),
        })
}

fn created_at_from_epoch(created_utc: Option<f64>) -> DateTime<Utc> {
    created_utc
        .filter(|seconds| *seconds > 0.0)
        .and_then(|seconds| DateTime::from_timestamp_millis((seconds * 1000.0) as i64))
        .unwrap_or_else(Utc::now)
}

fn string_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str)
}

fn number_field(value: &Value, key: &str) -> Option<f64> {
    value.get(key).and_then(Value::as_f64)
}

fn integer_field(value: &Value, key: &str) -> Option<i64> {
    value
        .get(key)
        .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64)))
}

fn preview(value: &Value) -> String {
    let mut text = value.to_string();
    if text.len() > 120 {
        let mut cut = 120;
        while !text.is_char_boundary(cut) {
            cut -= 1;
        }
        text.truncate(cut);
        text.push_str("...");
    }
    text
}
