//! Configuration for eddy.
//!
//! Non-secret settings load from `~/.config/eddy/config.toml` when the file
//! exists; missing fields fall back to defaults. Credentials come from the
//! environment only: `REDDIT_CLIENT_ID` and `REDDIT_CLIENT_SECRET` for the
//! Reddit API, `EDDY_LLM_API_KEY` (or `OPENAI_API_KEY`) for the summarizer.
//! `REDDIT_USER_AGENT` overrides the configured user agent.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::app::{EddyError, Result};

pub const DEFAULT_USER_AGENT: &str = concat!("eddy/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the authorization endpoint host.
    pub auth_base_url: String,
    /// Host name serving authenticated data requests.
    pub api_host: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    pub max_comments: usize,
    pub max_comment_chars: usize,
    pub llm: LlmSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auth_base_url: "https://www.reddit.com".into(),
            api_host: "oauth.reddit.com".into(),
            user_agent: DEFAULT_USER_AGENT.into(),
            timeout_secs: 30,
            max_comments: 10,
            max_comment_chars: 600,
            llm: LlmSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub base_url: String,
    pub model: String,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".into(),
            model: "gpt-4o-mini".into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub settings: Settings,
    pub credentials: Option<Credentials>,
    pub llm_api_key: Option<String>,
}

impl Config {
    /// Load settings from the default config path (if present) and secrets
    /// from the environment.
    pub fn load() -> Result<Self> {
        let settings = match Settings::default_config_path() {
            Some(path) if path.exists() => Settings::from_file(&path)?,
            _ => Settings::default(),
        };

        Ok(Self::from_settings_and_env(settings))
    }

    fn from_settings_and_env(mut settings: Settings) -> Self {
        if let Ok(user_agent) = env::var("REDDIT_USER_AGENT") {
            settings.user_agent = user_agent;
        }

        let credentials = match (env::var("REDDIT_CLIENT_ID"), env::var("REDDIT_CLIENT_SECRET")) {
            (Ok(client_id), Ok(client_secret)) => Some(Credentials {
                client_id,
                client_secret,
            }),
            _ => None,
        };

        let llm_api_key = env::var("EDDY_LLM_API_KEY")
            .or_else(|_| env::var("OPENAI_API_KEY"))
            .ok();

        Self {
            settings,
            credentials,
            llm_api_key,
        }
    }

    pub fn require_credentials(&self) -> Result<&Credentials> {
        self.credentials.as_ref().ok_or_else(|| {
            EddyError::Config("REDDIT_CLIENT_ID and REDDIT_CLIENT_SECRET must be set".into())
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.settings.timeout_secs)
    }
}

impl Settings {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| {
            EddyError::Config(format!("invalid config file {}: {}", path.display(), e))
        })
    }

    /// `~/.config/eddy/config.toml`
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("eddy").join("config.toml"))
    }
}
