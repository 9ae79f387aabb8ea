//! Slack Web API client for posting step messages.
//!
//! Only `chat.postMessage` is needed. Slack reports most failures with HTTP 200
//! and `{"ok": false, "error": "<code>"}`, so the body is always inspected.

use crate::api::directory_url;
use crate::blocks::Block;
use crate::error::PostError;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, instrument, warn};
use url::Url;

/// Body of a `chat.postMessage` call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostMessage {
    pub channel: String,
    /// Plain-text fallback used by notifications; the whole message when `blocks` is unset.
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocks: Option<Vec<Block>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unfurl_links: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unfurl_media: Option<bool>,
}

impl PostMessage {
    /// A block message with link and media previews disabled.
    pub fn blocks(channel: &str, blocks: Vec<Block>, fallback_text: &str) -> Self {
        Self {
            channel: channel.to_string(),
            text: fallback_text.to_string(),
            blocks: Some(blocks),
            unfurl_links: Some(false),
            unfurl_media: Some(false),
        }
    }

    /// A plain-text message with Slack's default preview behavior.
    pub fn text(channel: &str, text: &str) -> Self {
        Self {
            channel: channel.to_string(),
            text: text.to_string(),
            blocks: None,
            unfurl_links: None,
            unfurl_media: None,
        }
    }
}

/// A message Slack accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostedMessage {
    pub channel: String,
    /// Message timestamp, which doubles as its id within the channel.
    pub ts: String,
}

/// Anything that can deliver a message to a channel.
#[allow(async_fn_in_trait)]
pub trait MessagePoster {
    async fn post_message(&self, message: &PostMessage) -> Result<PostedMessage, PostError>;
}

#[derive(Debug, Deserialize)]
struct MessageRef {
    ts: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PostMessageResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    channel: Option<String>,
    #[serde(default)]
    ts: Option<String>,
    #[serde(default)]
    message: Option<MessageRef>,
}

/// Bot-token authenticated Slack Web API client.
pub struct SlackClient {
    base_url: Url,
    token: String,
    client: reqwest::Client,
}

impl SlackClient {
    /// Create a client for the Web API rooted at `base_url` (e.g. `https://slack.com/api/`).
    pub fn new(base_url: &str, token: impl Into<String>) -> Result<Self, PostError> {
        Ok(Self {
            base_url: directory_url(base_url)?,
            token: token.into(),
            client: reqwest::Client::new(),
        })
    }
}

impl fmt::Debug for SlackClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlackClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl MessagePoster for SlackClient {
    #[instrument(level = "info", skip_all, fields(channel = %message.channel))]
    async fn post_message(&self, message: &PostMessage) -> Result<PostedMessage, PostError> {
        let url = self.base_url.join("chat.postMessage")?;
        let response: PostMessageResponse = self
            .client
            .post(url)
            .bearer_auth(&self.token)
            .json(message)
            .send()
            .await?
            .json()
            .await?;

        if !response.ok {
            let code = response.error.unwrap_or_else(|| "unknown_error".to_string());
            warn!(error = %code, "chat.postMessage rejected");
            return Err(PostError::Api(code));
        }

        let ts = response
            .message
            .and_then(|m| m.ts)
            .or(response.ts)
            .ok_or(PostError::MissingTimestamp)?;
        debug!(%ts, "Message posted");

        Ok(PostedMessage {
            channel: response.channel.unwrap_or_else(|| message.channel.clone()),
            ts,
        })
    }
}
