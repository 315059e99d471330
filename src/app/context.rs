use std::sync::Arc;

use crate::app::Result;
use crate::auth::{HttpTokenTransport, TokenCache, TokenRequest};
use crate::config::Config;
use crate::digest::DigestOptions;
use crate::fetcher::ThreadFetcher;
use crate::resolver::{HttpRedirectProbe, ShareLinkResolver};
use crate::summarizer::Summarizer;

pub struct AppContext {
    pub resolver: ShareLinkResolver,
    pub fetcher: ThreadFetcher,
    pub digest_options: DigestOptions,
    pub summarizer: Option<Summarizer>,
}

impl AppContext {
    /// Wire the pipeline from configuration. Fails fast when the Reddit
    /// credentials are missing; the summarizer is optional.
    pub fn new(config: &Config) -> Result<Self> {
        let credentials = config.require_credentials()?;
        let settings = &config.settings;
        let timeout = config.timeout();

        let probe = Arc::new(HttpRedirectProbe::new(&settings.user_agent, timeout)?);
        let resolver = ShareLinkResolver::new(probe);

        let request = TokenRequest {
            url: format!(
                "{}/api/v1/access_token",
                settings.auth_base_url.trim_end_matches('/')
            ),
            client_id: credentials.client_id.clone(),
            client_secret: credentials.client_secret.clone(),
            user_agent: settings.user_agent.clone(),
        };
        let transport = Arc::new(HttpTokenTransport::new(timeout)?);
        let tokens = Arc::new(TokenCache::new(transport, request));
        let fetcher = ThreadFetcher::new(tokens, &settings.api_host, &settings.user_agent, timeout)?;

        let summarizer = config
            .llm_api_key
            .as_deref()
            .map(|key| Summarizer::new(key, &settings.llm.base_url, &settings.llm.model, timeout))
            .transpose()?;

        let digest_options = DigestOptions {
            max_comments: settings.max_comments,
            max_comment_chars: settings.max_comment_chars,
        };

        Ok(Self {
            resolver,
            fetcher,
            digest_options,
            summarizer,
        })
    }
}
