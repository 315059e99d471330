use serde::{Deserialize, Serialize};

/// Submission metadata from the first element of the thread listing.
#[derive(Debug, Clone, Deserialize)]
pub struct Post {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub selftext: String,
    #[serde(default)]
    pub num_comments: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub score: i64,
}

/// Condensed thread: the post plus the filtered comment selection.
#[derive(Debug, Clone)]
pub struct ThreadDigest {
    pub post: Post,
    pub comments: Vec<Comment>,
}

/// Downstream-facing digest shape, camelCase on the wire.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DigestResponse {
    pub title: String,
    pub author: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selftext: Option<String>,
    pub comment_count: i64,
    pub top_comments: Vec<Comment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl DigestResponse {
    pub fn from_digest(digest: ThreadDigest, summary: Option<String>) -> Self {
        let selftext = if digest.post.selftext.trim().is_empty() {
            None
        } else {
            Some(digest.post.selftext)
        };

        Self {
            title: digest.post.title,
            author: digest.post.author,
            selftext,
            comment_count: digest.post.num_comments,
            top_comments: digest.comments,
            summary,
        }
    }
}
