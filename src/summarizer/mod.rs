use std::time::Duration;

use serde_json::{json, Value};

use crate::app::{EddyError, Result};
use crate::domain::ThreadDigest;

/// Single-request client for an OpenAI-compatible chat-completions
/// endpoint. The pipeline treats it as optional: no API key means the
/// digest ships without prose.
pub struct Summarizer {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl Summarizer {
    pub fn new(api_key: &str, base_url: &str, model: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }

    pub async fn summarize(&self, digest: &ThreadDigest) -> Result<String> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let payload = json!({
            "model": self.model,
            "messages": [
                { "role": "user", "content": build_prompt(digest) }
            ],
            "temperature": 0.2
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(EddyError::Summarize(format!(
                "summarization endpoint returned {}",
                response.status()
            )));
        }

        let body: Value = response.json().await?;
        body.pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .map(|text| text.trim().to_string())
            .ok_or_else(|| EddyError::Summarize("response missing message content".into()))
    }
}

pub fn build_prompt(digest: &ThreadDigest) -> String {
    let mut prompt = String::from(
        "Summarize this Reddit discussion in one short paragraph. \
         Cover the question or topic and the main viewpoints from the comments.\n\n",
    );

    prompt.push_str(&format!("Title: {}\n", digest.post.title));
    if !digest.post.selftext.trim().is_empty() {
        prompt.push_str(&format!("Post: {}\n", digest.post.selftext));
    }

    if !digest.comments.is_empty() {
        prompt.push_str("\nTop comments:\n");
        for comment in &digest.comments {
            prompt.push_str(&format!(
                "- {} ({} points): {}\n",
                comment.author, comment.score, comment.body
            ));
        }
    }

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Comment, Post};

    fn digest() -> ThreadDigest {
        ThreadDigest {
            post: Post {
                title: "What editor do you use?".into(),
                author: "asker".into(),
                selftext: "Curious what everyone runs.".into(),
                num_comments: 2,
            },
            comments: vec![Comment {
                author: "alice".into(),
                body: "Helix.".into(),
                score: 42,
            }],
        }
    }

    #[test]
    fn prompt_includes_title_selftext_and_comments() {
        let prompt = build_prompt(&digest());

        assert!(prompt.contains("Title: What editor do you use?"));
        assert!(prompt.contains("Post: Curious what everyone runs."));
        assert!(prompt.contains("- alice (42 points): Helix."));
    }

    #[test]
    fn prompt_omits_empty_sections() {
        let mut digest = digest();
        digest.post.selftext = String::new();
        digest.comments.clear();

        let prompt = build_prompt(&digest);

        assert!(!prompt.contains("Post:"));
        assert!(!prompt.contains("Top comments:"));
    }
}
