//! Error kinds raised by the fetcher, the Slack client, input resolution and
//! settings loading.
//!
//! None of these escape the execute callback: [`crate::step`] converts them
//! into a [`StepFailure`] carrying a human-readable message for the host.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure while fetching or decoding articles from the News API.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport failure.
    #[error("request to News API failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid News API URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("News API returned a non-JSON body: {0}")]
    Decode(#[from] serde_json::Error),

    /// The API answered with `status: "error"`.
    #[error("News API error {code}: {message}")]
    Api { code: String, message: String },

    /// The response body has no `articles` field.
    #[error("malformed News API response: missing `articles`")]
    MalformedResponse,

    #[error("invalid publishedAt timestamp {value:?}: {reason}")]
    InvalidTimestamp { value: String, reason: String },
}

/// Failure while posting a message to Slack.
#[derive(Debug, Error)]
pub enum PostError {
    #[error("request to Slack failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid Slack API URL: {0}")]
    Url(#[from] url::ParseError),

    /// Slack answered `ok: false`; carries its error code (e.g. `channel_not_found`).
    #[error("Slack API error: {0}")]
    Api(String),

    #[error("Slack response carried no message timestamp")]
    MissingTimestamp,
}

/// A persisted step input is absent or cannot be interpreted.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("missing step input `{0}`")]
    Missing(&'static str),

    #[error("invalid number of articles {0:?}")]
    InvalidNumArticles(String),

    #[error("unsupported language {0:?}")]
    UnsupportedLanguage(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Step-level failure reported to the host framework instead of completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{message}")]
pub struct StepFailure {
    pub message: String,
}

impl StepFailure {
    /// Failure of the fetch phase (input resolution included).
    pub fn fetch(cause: impl std::fmt::Display) -> Self {
        Self {
            message: format!("Failed to fetch news articles ({cause})"),
        }
    }

    /// Failure of the posting phase.
    pub fn notification(cause: impl std::fmt::Display) -> Self {
        Self {
            message: format!("Notification failed ({cause})"),
        }
    }
}
