use thiserror::Error;

#[derive(Error, Debug)]
pub enum EddyError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authorization endpoint rejected the request (status {status}): {body}")]
    Auth { status: u16, body: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Malformed thread payload: {0}")]
    MalformedThread(String),

    #[error("Summarization failed: {0}")]
    Summarize(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, EddyError>;
