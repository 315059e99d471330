use serde_json::Value;

use crate::app::{EddyError, Result};
use crate::domain::{Comment, Post, ThreadDigest};

#[derive(Debug, Clone)]
pub struct DigestOptions {
    /// How many comments survive the filter.
    pub max_comments: usize,
    /// Per-comment body limit in characters.
    pub max_comment_chars: usize,
}

impl Default for DigestOptions {
    fn default() -> Self {
        Self {
            max_comments: 10,
            max_comment_chars: 600,
        }
    }
}

/// Build a digest from the raw two-element thread listing: the post from
/// the first element, filtered comments from the second. Listing order is
/// preserved; non-comment nodes ("more" stubs etc.) and deleted comments
/// are dropped.
pub fn build(payload: &Value, options: &DigestOptions) -> Result<ThreadDigest> {
    let listings = payload
        .as_array()
        .filter(|listings| listings.len() >= 2)
        .ok_or_else(|| malformed("expected a two-element listing array"))?;

    let post_value = listings[0]
        .pointer("/data/children/0/data")
        .ok_or_else(|| malformed("missing post node"))?;
    let post: Post = serde_json::from_value(post_value.clone())
        .map_err(|e| malformed(&format!("unreadable post node: {e}")))?;

    let children = listings[1]
        .pointer("/data/children")
        .and_then(Value::as_array)
        .ok_or_else(|| malformed("missing comment listing"))?;

    let comments = children
        .iter()
        .filter(|node| node.get("kind").and_then(Value::as_str) == Some("t1"))
        .filter_map(|node| node.get("data"))
        .filter_map(|data| serde_json::from_value::<Comment>(data.clone()).ok())
        .filter(is_displayable)
        .map(|comment| truncate_body(comment, options.max_comment_chars))
        .take(options.max_comments)
        .collect();

    Ok(ThreadDigest { post, comments })
}

fn is_displayable(comment: &Comment) -> bool {
    !comment.body.is_empty()
        && comment.body != "[deleted]"
        && comment.body != "[removed]"
        && !comment.author.is_empty()
        && comment.author != "[deleted]"
}

fn truncate_body(mut comment: Comment, limit: usize) -> Comment {
    if comment.body.chars().count() > limit {
        let mut body: String = comment.body.chars().take(limit).collect();
        body.push_str("...");
        comment.body = body;
    }
    comment
}

fn malformed(detail: &str) -> EddyError {
    EddyError::MalformedThread(detail.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const THREAD_SAMPLE: &str = r#"[
      {
        "data": {
          "children": [
            {
              "kind": "t3",
              "data": {
                "title": "What editor do you use?",
                "author": "asker",
                "selftext": "Curious what everyone runs these days.",
                "num_comments": 4
              }
            }
          ]
        }
      },
      {
        "data": {
          "children": [
            {
              "kind": "t1",
              "data": { "author": "alice", "body": "Helix, never looked back.", "score": 42 }
            },
            {
              "kind": "t1",
              "data": { "author": "[deleted]", "body": "[deleted]", "score": 5 }
            },
            {
              "kind": "t1",
              "data": { "author": "bob", "body": "Still vim.", "score": 17 }
            },
            {
              "kind": "more",
              "data": { "count": 12, "children": ["aaa", "bbb"] }
            }
          ]
        }
      }
    ]"#;

    fn sample() -> Value {
        serde_json::from_str(THREAD_SAMPLE).unwrap()
    }

    #[test]
    fn extracts_post_and_filtered_comments() {
        let digest = build(&sample(), &DigestOptions::default()).unwrap();

        assert_eq!(digest.post.title, "What editor do you use?");
        assert_eq!(digest.post.author, "asker");
        assert_eq!(digest.post.num_comments, 4);
        assert_eq!(digest.comments.len(), 2);
        assert_eq!(digest.comments[0].author, "alice");
        assert_eq!(digest.comments[1].body, "Still vim.");
    }

    #[test]
    fn honors_comment_limit() {
        let options = DigestOptions {
            max_comments: 1,
            ..DigestOptions::default()
        };
        let digest = build(&sample(), &options).unwrap();

        assert_eq!(digest.comments.len(), 1);
        assert_eq!(digest.comments[0].author, "alice");
    }

    #[test]
    fn truncates_long_bodies_on_char_boundaries() {
        let options = DigestOptions {
            max_comment_chars: 3,
            ..DigestOptions::default()
        };
        let payload: Value = serde_json::json!([
            { "data": { "children": [ { "kind": "t3", "data": { "title": "t", "author": "a" } } ] } },
            { "data": { "children": [
                { "kind": "t1", "data": { "author": "c", "body": "héllo wörld", "score": 1 } }
            ] } }
        ]);

        let digest = build(&payload, &options).unwrap();
        assert_eq!(digest.comments[0].body, "hél...");
    }

    #[test]
    fn rejects_non_array_payload() {
        let payload = serde_json::json!({ "data": {} });
        assert!(matches!(
            build(&payload, &DigestOptions::default()),
            Err(EddyError::MalformedThread(_))
        ));
    }

    #[test]
    fn rejects_single_element_listing() {
        let payload = serde_json::json!([{ "data": { "children": [] } }]);
        assert!(matches!(
            build(&payload, &DigestOptions::default()),
            Err(EddyError::MalformedThread(_))
        ));
    }

    #[test]
    fn rejects_listing_without_post() {
        let payload = serde_json::json!([
            { "data": { "children": [] } },
            { "data": { "children": [] } }
        ]);
        assert!(matches!(
            build(&payload, &DigestOptions::default()),
            Err(EddyError::MalformedThread(_))
        ));
    }
}
