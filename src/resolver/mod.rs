use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::LOCATION;
use reqwest::redirect;
use url::Url;

use crate::app::Result;
use crate::normalizer;

/// Raw outcome of a redirect probe: the status code and the `location`
/// header, uninterpreted.
#[derive(Debug, Clone)]
pub struct ProbeResponse {
    pub status: u16,
    pub location: Option<String>,
}

#[async_trait]
pub trait RedirectProbe {
    async fn probe(&self, url: &Url) -> Result<ProbeResponse>;
}

/// Probe implementation that issues a single GET with redirect following
/// disabled, so the service's own `location` answer is observable.
pub struct HttpRedirectProbe {
    client: reqwest::Client,
}

impl HttpRedirectProbe {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .redirect(redirect::Policy::none())
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl RedirectProbe for HttpRedirectProbe {
    async fn probe(&self, url: &Url) -> Result<ProbeResponse> {
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status().as_u16();
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        Ok(ProbeResponse { status, location })
    }
}

/// Resolves share links by asking the service for the redirect it would
/// issue. Used ahead of local normalization for tokens that cannot be
/// decoded offline.
pub struct ShareLinkResolver {
    probe: Arc<dyn RedirectProbe + Send + Sync>,
}

impl ShareLinkResolver {
    pub fn new(probe: Arc<dyn RedirectProbe + Send + Sync>) -> Self {
        Self { probe }
    }

    /// Returns the redirect target for a share link, or `None` when the
    /// input is not a share link or the probe is inconclusive. Network
    /// failures are absorbed; the caller falls back to local
    /// normalization.
    pub async fn resolve(&self, input: &str) -> Option<String> {
        let url = Url::parse(input.trim()).ok()?;
        normalizer::share_token(&url)?;

        let response = match self.probe.probe(&url).await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!("share link probe failed for {}: {}", url, e);
                return None;
            }
        };

        if !(300..400).contains(&response.status) {
            return None;
        }

        let location = response.location?;
        let resolved = url.join(&location).ok()?;
        tracing::debug!("share link {} resolved to {}", url, resolved);
        Some(resolved.into())
    }
}
