use std::sync::Arc;
use std::time::Duration;

use reqwest::header::ACCEPT;
use url::Url;

use crate::app::Result;
use crate::auth::TokenCache;

/// Rewrite a canonical endpoint onto the authenticated API host: swap the
/// host, drop any explicit port, and force `raw_json=1` so text comes back
/// unescaped.
pub fn api_endpoint(endpoint: &str, api_host: &str) -> Result<Url> {
    let mut url = Url::parse(endpoint)?;
    url.set_host(Some(api_host))?;
    let _ = url.set_port(None);
    url.set_query(Some("raw_json=1"));
    Ok(url)
}

/// Issues authenticated thread requests against the API host, consulting
/// the token cache per request. Payload structure is not interpreted here;
/// that is the digest builder's job.
pub struct ThreadFetcher {
    client: reqwest::Client,
    tokens: Arc<TokenCache>,
    api_host: String,
}

impl ThreadFetcher {
    pub fn new(
        tokens: Arc<TokenCache>,
        api_host: &str,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            tokens,
            api_host: api_host.to_string(),
        })
    }

    /// Fetch the raw thread payload for a canonical endpoint. HTTP and
    /// network failures propagate to the caller untouched.
    pub async fn fetch_thread(&self, endpoint: &str) -> Result<serde_json::Value> {
        let token = self.tokens.access_token().await?;
        let url = api_endpoint(endpoint, &self.api_host)?;
        tracing::debug!("fetching thread {}", url);

        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .bearer_auth(token)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json().await?)
    }
}
