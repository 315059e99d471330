use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::app::{EddyError, Result};

/// Seconds of slack on credential lifetime: a cached token must have more
/// than this left to be reused, and the stored expiry is shortened by the
/// same amount to force early refresh.
pub const EXPIRY_MARGIN_SECS: i64 = 60;

/// Upper bound on how much of an auth error body is carried in the error.
const MAX_ERROR_BODY_BYTES: usize = 200;

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Parameters of the client-credentials grant.
#[derive(Debug, Clone)]
pub struct TokenRequest {
    pub url: String,
    pub client_id: String,
    pub client_secret: String,
    pub user_agent: String,
}

/// Raw reply from the authorization endpoint, before interpretation.
#[derive(Debug, Clone)]
pub struct TokenReply {
    pub status: u16,
    pub body: String,
}

#[async_trait]
pub trait TokenTransport {
    async fn request_token(&self, request: &TokenRequest) -> Result<TokenReply>;
}

pub struct HttpTokenTransport {
    client: reqwest::Client,
}

impl HttpTokenTransport {
    pub fn new(timeout: std::time::Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl TokenTransport for HttpTokenTransport {
    async fn request_token(&self, request: &TokenRequest) -> Result<TokenReply> {
        let response = self
            .client
            .post(&request.url)
            .basic_auth(&request.client_id, Some(&request.client_secret))
            .header(reqwest::header::USER_AGENT, &request.user_agent)
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(TokenReply { status, body })
    }
}

#[derive(Debug, Clone)]
struct CachedCredential {
    token: String,
    expires_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: u64,
}

/// Single cached bearer credential, overwritten on refresh. The lock is
/// held across the refresh request, so callers racing on an expired
/// credential trigger one token request between them.
pub struct TokenCache {
    transport: Arc<dyn TokenTransport + Send + Sync>,
    clock: Arc<dyn Clock>,
    request: TokenRequest,
    state: Mutex<Option<CachedCredential>>,
}

impl TokenCache {
    pub fn new(transport: Arc<dyn TokenTransport + Send + Sync>, request: TokenRequest) -> Self {
        Self::with_clock(transport, request, Arc::new(SystemClock))
    }

    pub fn with_clock(
        transport: Arc<dyn TokenTransport + Send + Sync>,
        request: TokenRequest,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            transport,
            clock,
            request,
            state: Mutex::new(None),
        }
    }

    /// Return a valid bearer token, refreshing it when the cached one is
    /// within [`EXPIRY_MARGIN_SECS`] of expiry.
    pub async fn access_token(&self) -> Result<String> {
        let mut state = self.state.lock().await;

        if let Some(credential) = state.as_ref() {
            if credential.expires_at > self.clock.now() + Duration::seconds(EXPIRY_MARGIN_SECS) {
                return Ok(credential.token.clone());
            }
        }

        tracing::debug!("requesting fresh access token");
        let reply = self.transport.request_token(&self.request).await?;

        if !(200..300).contains(&reply.status) {
            return Err(EddyError::Auth {
                status: reply.status,
                body: truncate_body(&reply.body),
            });
        }

        let parsed: TokenResponse = serde_json::from_str(&reply.body).map_err(|_| {
            EddyError::Auth {
                status: reply.status,
                body: truncate_body(&reply.body),
            }
        })?;

        let lifetime = parsed.expires_in.saturating_sub(EXPIRY_MARGIN_SECS as u64);
        let credential = CachedCredential {
            token: parsed.access_token,
            expires_at: self.clock.now() + Duration::seconds(lifetime as i64),
        };
        let token = credential.token.clone();
        *state = Some(credential);

        Ok(token)
    }
}

fn truncate_body(body: &str) -> String {
    let mut end = MAX_ERROR_BODY_BYTES.min(body.len());
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    body[..end].to_string()
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex as StdMutex;

    use super::*;

    struct ManualClock {
        now: StdMutex<DateTime<Utc>>,
    }

    impl ManualClock {
        fn starting_now() -> Self {
            Self {
                now: StdMutex::new(Utc::now()),
            }
        }

        fn advance(&self, seconds: i64) {
            let mut now = self.now.lock().unwrap();
            *now = *now + Duration::seconds(seconds);
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.now.lock().unwrap()
        }
    }

    struct FakeTransport {
        calls: AtomicUsize,
        replies: StdMutex<VecDeque<TokenReply>>,
    }

    impl FakeTransport {
        fn with_replies(replies: Vec<TokenReply>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                replies: StdMutex::new(replies.into()),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TokenTransport for FakeTransport {
        async fn request_token(&self, _request: &TokenRequest) -> Result<TokenReply> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .replies
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected token request"))
        }
    }

    fn token_reply(token: &str, expires_in: u64) -> TokenReply {
        TokenReply {
            status: 200,
            body: format!(r#"{{"access_token":"{token}","expires_in":{expires_in}}}"#),
        }
    }

    fn request() -> TokenRequest {
        TokenRequest {
            url: "https://www.reddit.com/api/v1/access_token".into(),
            client_id: "id".into(),
            client_secret: "secret".into(),
            user_agent: "eddy-test".into(),
        }
    }

    fn cache_with(
        replies: Vec<TokenReply>,
    ) -> (TokenCache, Arc<FakeTransport>, Arc<ManualClock>) {
        let transport = Arc::new(FakeTransport::with_replies(replies));
        let clock = Arc::new(ManualClock::starting_now());
        let cache = TokenCache::with_clock(transport.clone(), request(), clock.clone());
        (cache, transport, clock)
    }

    #[tokio::test]
    async fn reuses_cached_token_within_validity_window() {
        let (cache, transport, _clock) = cache_with(vec![token_reply("first", 3600)]);

        assert_eq!(cache.access_token().await.unwrap(), "first");
        assert_eq!(cache.access_token().await.unwrap(), "first");
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn refreshes_and_overwrites_after_expiry() {
        let (cache, transport, clock) =
            cache_with(vec![token_reply("first", 3600), token_reply("second", 3600)]);

        assert_eq!(cache.access_token().await.unwrap(), "first");
        clock.advance(3600);
        assert_eq!(cache.access_token().await.unwrap(), "second");
        assert_eq!(transport.calls(), 2);
    }

    // expires_in 3600 stores an expiry 3540s out; the 60s reuse margin
    // means the credential goes stale 3480s after issuance.
    #[tokio::test]
    async fn expiry_accounts_for_both_margins() {
        let (cache, transport, clock) =
            cache_with(vec![token_reply("first", 3600), token_reply("second", 3600)]);

        cache.access_token().await.unwrap();
        clock.advance(3479);
        cache.access_token().await.unwrap();
        assert_eq!(transport.calls(), 1);

        clock.advance(2);
        assert_eq!(cache.access_token().await.unwrap(), "second");
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn rejected_grant_surfaces_status_and_body() {
        let (cache, _transport, _clock) = cache_with(vec![TokenReply {
            status: 401,
            body: "unauthorized_client".into(),
        }]);

        match cache.access_token().await {
            Err(EddyError::Auth { status, body }) => {
                assert_eq!(status, 401);
                assert_eq!(body, "unauthorized_client");
            }
            other => panic!("expected auth error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn reply_without_token_field_is_an_auth_error() {
        let (cache, _transport, _clock) = cache_with(vec![TokenReply {
            status: 200,
            body: r#"{"error":"invalid_grant"}"#.into(),
        }]);

        assert!(matches!(
            cache.access_token().await,
            Err(EddyError::Auth { status: 200, .. })
        ));
    }

    #[tokio::test]
    async fn long_error_bodies_are_truncated() {
        let (cache, _transport, _clock) = cache_with(vec![TokenReply {
            status: 503,
            body: "x".repeat(1000),
        }]);

        match cache.access_token().await {
            Err(EddyError::Auth { body, .. }) => assert_eq!(body.len(), 200),
            other => panic!("expected auth error, got {other:?}"),
        }
    }
}
