//! Runtime settings and the fixed constants of the news step.
//!
//! Everything that can reasonably change between deployments (API base URLs,
//! the display timezone) lives in [`Settings`], loadable from an optional YAML
//! file. Secrets are deliberately absent: the News API key and the Slack bot
//! token are passed in by the embedding application or the CLI.
//!
//! # Example `config.yaml`
//!
//! ```yaml
//! news_api_url: https://newsapi.org
//! slack_api_url: https://slack.com/api/
//! display_timezone: Asia/Tokyo
//! ```

use crate::error::ConfigError;
use chrono_tz::Tz;
use serde::Deserialize;
use std::path::Path;
use tracing::{info, instrument};

/// Identifier the host workflow framework routes step events by.
pub const CALLBACK_ID: &str = "news_step";

/// Zone attached to the naive `publishedAt` value once its designator is stripped.
pub const PUBLISHED_AT_TIMEZONE: Tz = chrono_tz::UTC;

/// Zone article timestamps are rendered in.
pub const DISPLAY_TIMEZONE: Tz = chrono_tz::Asia::Tokyo;

pub const DEFAULT_NEWS_API_URL: &str = "https://newsapi.org";

pub const DEFAULT_SLACK_API_URL: &str = "https://slack.com/api/";

/// Page size used when the caller does not ask for a specific count.
pub const DEFAULT_NUM_ARTICLES: u32 = 3;

/// Deployment settings for the news step.
///
/// All fields are optional in the YAML file; missing keys fall back to the
/// constants above.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Base URL of the News API (the `v2/...` paths are joined onto it).
    pub news_api_url: String,
    /// Base URL of the Slack Web API (`chat.postMessage` is joined onto it).
    pub slack_api_url: String,
    /// IANA timezone used when rendering article timestamps.
    pub display_timezone: Tz,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            news_api_url: DEFAULT_NEWS_API_URL.to_string(),
            slack_api_url: DEFAULT_SLACK_API_URL.to_string(),
            display_timezone: DISPLAY_TIMEZONE,
        }
    }
}

impl Settings {
    /// Parse settings from YAML text. An empty document yields the defaults.
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Load settings from `path`, or the defaults when no path is given.
    #[instrument(level = "info")]
    pub async fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            info!("No config file given; using default settings");
            return Ok(Self::default());
        };

        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.display().to_string(),
                source,
            })?;
        let settings = Self::from_yaml(&text)?;
        info!(
            news_api_url = %settings.news_api_url,
            slack_api_url = %settings.slack_api_url,
            display_timezone = %settings.display_timezone,
            "Loaded settings"
        );
        Ok(settings)
    }
}
