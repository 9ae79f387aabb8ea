//! Data models for fetched articles and the step's persisted configuration.
//!
//! This module defines the records that flow through the step:
//! - [`Article`] / [`Source`]: a normalized News API article
//! - [`RawArticle`] / [`NewsApiResponse`]: the wire shape returned by News API
//! - [`StepInputs`]: the configuration the host framework stores for the step
//! - [`OutputDeclaration`] / [`StepOutputs`]: what the step hands to later steps
//!
//! The wire records use camelCase field names to match the News API JSON,
//! hence the `rename_all` attributes.

use crate::config::{DEFAULT_NUM_ARTICLES, PUBLISHED_AT_TIMEZONE};
use crate::error::{FetchError, InputError};
use crate::utils::split_channel_ids;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub const INPUT_CHANNEL_IDS: &str = "channel_ids";
pub const INPUT_QUERY: &str = "query";
pub const INPUT_NUM_ARTICLES: &str = "num_articles";
pub const INPUT_LANGUAGE: &str = "language";

/// Label of every output variable the step declares.
pub const OUTPUT_LABEL: &str = "投稿されたメッセージの時刻";

/// The publisher of an article.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Source {
    /// News API source identifier; empty when the API reports `null`.
    pub id: String,
    pub name: String,
}

/// A normalized news article.
///
/// Nullable upstream fields are mapped to empty strings, so an article without
/// an image has an empty `image_url`.
#[derive(Debug, Clone, PartialEq)]
pub struct Article {
    pub source: Source,
    pub author: String,
    pub title: String,
    pub description: String,
    pub url: String,
    pub image_url: String,
    /// Publication instant, always in UTC.
    pub published_at: DateTime<Utc>,
    pub content: String,
}

/// Top-level body returned by both News API endpoints.
///
/// Error replies carry `status: "error"` with `code`/`message` and no `articles`.
#[derive(Debug, Deserialize)]
pub struct NewsApiResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub articles: Option<Vec<RawArticle>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawSource {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// One article exactly as News API serializes it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawArticle {
    pub source: RawSource,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub url_to_image: Option<String>,
    pub published_at: String,
    #[serde(default)]
    pub content: Option<String>,
}

impl TryFrom<RawArticle> for Article {
    type Error = FetchError;

    fn try_from(raw: RawArticle) -> Result<Self, Self::Error> {
        Ok(Self {
            published_at: parse_published_at(&raw.published_at)?,
            source: Source {
                id: raw.source.id.unwrap_or_default(),
                name: raw.source.name.unwrap_or_default(),
            },
            author: raw.author.unwrap_or_default(),
            title: raw.title.unwrap_or_default(),
            description: raw.description.unwrap_or_default(),
            url: raw.url.unwrap_or_default(),
            image_url: raw.url_to_image.unwrap_or_default(),
            content: raw.content.unwrap_or_default(),
        })
    }
}

/// Parse a News API `publishedAt` value such as `2020-05-13T01:02:03Z`.
///
/// The final character (the zone designator) is dropped and the remainder is
/// read as a naive timestamp in [`PUBLISHED_AT_TIMEZONE`]. Seconds may be
/// omitted (`2020-05-13T01:02Z`) and a bare date (`2020-05-13Z`) means
/// midnight. Offsets other than `Z` are not understood.
pub fn parse_published_at(value: &str) -> Result<DateTime<Utc>, FetchError> {
    let invalid = |reason: String| FetchError::InvalidTimestamp {
        value: value.to_string(),
        reason,
    };

    let mut chars = value.chars();
    chars.next_back();
    let naive = parse_naive(chars.as_str()).map_err(|e| invalid(e.to_string()))?;

    PUBLISHED_AT_TIMEZONE
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| invalid(format!("nonexistent local time in {PUBLISHED_AT_TIMEZONE}")))
}

fn parse_naive(s: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::from_str(s)
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M"))
        .or_else(|full_err| {
            NaiveDate::from_str(s)
                .map(|date| date.and_time(NaiveTime::MIN))
                .map_err(|_| full_err)
        })
}

/// Language of the articles to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Jp,
    En,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Jp => "jp",
            Language::En => "en",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "jp" => Ok(Language::Jp),
            "en" => Ok(Language::En),
            other => Err(InputError::UnsupportedLanguage(other.to_string())),
        }
    }
}

/// A single persisted step input: `{"value": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InputValue {
    pub value: Option<String>,
}

impl InputValue {
    pub fn new(value: Option<String>) -> Self {
        Self { value }
    }
}

/// The configuration the host framework stores for this step.
///
/// A field is `None` when it has never been saved; a saved field may still
/// carry a `null` value when the submission did not match the expected shape.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StepInputs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_ids: Option<InputValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<InputValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_articles: Option<InputValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<InputValue>,
}

/// What to ask the News API for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleQuery {
    /// Keywords separated by `,` or `、`; empty means top headlines.
    pub query: String,
    pub num_articles: u32,
    pub language: Language,
}

impl Default for ArticleQuery {
    fn default() -> Self {
        Self {
            query: String::new(),
            num_articles: DEFAULT_NUM_ARTICLES,
            language: Language::default(),
        }
    }
}

/// [`StepInputs`] interpreted for one execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedInputs {
    pub channels: Vec<String>,
    pub article_query: ArticleQuery,
}

impl StepInputs {
    /// Interpret the stored string values.
    ///
    /// A missing or `null` query resolves to the empty string, and a blank
    /// article count to the default page size.
    pub fn resolve(&self) -> Result<ResolvedInputs, InputError> {
        let defaults = ArticleQuery::default();
        let query = self
            .query
            .as_ref()
            .and_then(|v| v.value.clone())
            .unwrap_or_default();

        let num_articles = required(&self.num_articles, INPUT_NUM_ARTICLES)?;
        let num_articles = match num_articles.trim() {
            "" => defaults.num_articles,
            n => n
                .parse::<u32>()
                .map_err(|_| InputError::InvalidNumArticles(num_articles.to_string()))?,
        };

        let language = required(&self.language, INPUT_LANGUAGE)?.parse::<Language>()?;
        let channels = split_channel_ids(required(&self.channel_ids, INPUT_CHANNEL_IDS)?);

        Ok(ResolvedInputs {
            channels,
            article_query: ArticleQuery {
                query,
                num_articles,
                language,
            },
        })
    }
}

fn required<'a>(input: &'a Option<InputValue>, key: &'static str) -> Result<&'a str, InputError> {
    input
        .as_ref()
        .and_then(|v| v.value.as_deref())
        .ok_or(InputError::Missing(key))
}

/// Declaration of one output variable made available to later workflow steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputDeclaration {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub label: String,
}

impl OutputDeclaration {
    /// The free-text "posted message timestamp" variable for `channel_id`.
    pub fn posted_message_ts(channel_id: &str) -> Self {
        Self {
            name: channel_id.to_string(),
            kind: "text".to_string(),
            label: OUTPUT_LABEL.to_string(),
        }
    }
}

/// Channel id to the timestamp of the message posted there.
pub type StepOutputs = BTreeMap<String, String>;

/// Result of the save callback: new inputs and declared outputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepUpdate {
    pub inputs: StepInputs,
    pub outputs: Vec<OutputDeclaration>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    fn saved(value: &str) -> Option<InputValue> {
        Some(InputValue::new(Some(value.to_string())))
    }

    #[test]
    fn test_parse_published_at_utc() {
        let ts = parse_published_at("2020-05-13T01:02:03Z").unwrap();
        assert_eq!(ts.to_rfc3339(), "2020-05-13T01:02:03+00:00");
    }

    #[test]
    fn test_parse_published_at_fractional_seconds() {
        let ts = parse_published_at("2024-11-02T23:15:00.123Z").unwrap();
        assert_eq!(ts.day(), 2);
        assert_eq!(ts.hour(), 23);
        assert_eq!(ts.timestamp_subsec_millis(), 123);
    }

    #[test]
    fn test_parse_published_at_without_seconds() {
        let ts = parse_published_at("2020-05-13T01:02Z").unwrap();
        assert_eq!(ts.to_rfc3339(), "2020-05-13T01:02:00+00:00");
    }

    #[test]
    fn test_parse_published_at_date_only() {
        let ts = parse_published_at("2020-05-13Z").unwrap();
        assert_eq!(ts.to_rfc3339(), "2020-05-13T00:00:00+00:00");
    }

    #[test]
    fn test_parse_published_at_rejects_garbage() {
        let err = parse_published_at("yesterday").unwrap_err();
        assert!(matches!(err, FetchError::InvalidTimestamp { .. }));
        assert!(parse_published_at("").is_err());
    }

    #[test]
    fn test_raw_article_nulls_become_empty() {
        let json = r#"{
            "source": {"id": null, "name": "NHK"},
            "author": null,
            "title": "Title",
            "description": "Desc",
            "url": "https://example.com/a",
            "urlToImage": null,
            "publishedAt": "2021-01-01T00:00:00Z",
            "content": null
        }"#;
        let raw: RawArticle = serde_json::from_str(json).unwrap();
        let article = Article::try_from(raw).unwrap();
        assert_eq!(article.source.id, "");
        assert_eq!(article.source.name, "NHK");
        assert_eq!(article.author, "");
        assert_eq!(article.image_url, "");
        assert_eq!(article.url, "https://example.com/a");
    }

    #[test]
    fn test_language_round_trip() {
        assert_eq!("jp".parse::<Language>().unwrap(), Language::Jp);
        assert_eq!("en".parse::<Language>().unwrap(), Language::En);
        assert_eq!(
            "fr".parse::<Language>().unwrap_err(),
            InputError::UnsupportedLanguage("fr".into())
        );
        assert_eq!(serde_json::to_string(&Language::En).unwrap(), "\"en\"");
    }

    #[test]
    fn test_resolve_inputs() {
        let inputs = StepInputs {
            channel_ids: saved("C1,C2"),
            query: saved("golang"),
            num_articles: saved("5"),
            language: saved("en"),
        };
        let resolved = inputs.resolve().unwrap();
        assert_eq!(resolved.channels, vec!["C1", "C2"]);
        assert_eq!(
            resolved.article_query,
            ArticleQuery {
                query: "golang".into(),
                num_articles: 5,
                language: Language::En,
            }
        );
    }

    #[test]
    fn test_article_query_defaults() {
        assert_eq!(
            ArticleQuery::default(),
            ArticleQuery {
                query: String::new(),
                num_articles: 3,
                language: Language::Jp,
            }
        );
    }

    #[test]
    fn test_resolve_blank_num_articles_uses_default() {
        let inputs = StepInputs {
            channel_ids: saved("C1"),
            query: saved("golang"),
            num_articles: saved("  "),
            language: saved("en"),
        };
        assert_eq!(
            inputs.resolve().unwrap().article_query.num_articles,
            DEFAULT_NUM_ARTICLES
        );
    }

    #[test]
    fn test_resolve_null_query_means_top_headlines() {
        let inputs = StepInputs {
            channel_ids: saved("C1"),
            query: Some(InputValue::new(None)),
            num_articles: saved("3"),
            language: saved("jp"),
        };
        assert_eq!(inputs.resolve().unwrap().article_query.query, "");
    }

    #[test]
    fn test_resolve_errors() {
        let mut inputs = StepInputs {
            channel_ids: saved("C1"),
            query: saved(""),
            num_articles: saved("three"),
            language: saved("jp"),
        };
        assert_eq!(
            inputs.resolve().unwrap_err(),
            InputError::InvalidNumArticles("three".into())
        );

        inputs.num_articles = Some(InputValue::new(None));
        assert_eq!(
            inputs.resolve().unwrap_err(),
            InputError::Missing("num_articles")
        );

        inputs.num_articles = saved("1");
        inputs.channel_ids = None;
        assert_eq!(
            inputs.resolve().unwrap_err(),
            InputError::Missing("channel_ids")
        );
    }

    #[test]
    fn test_step_inputs_serialization_skips_unsaved() {
        let inputs = StepInputs {
            query: saved("golang"),
            ..Default::default()
        };
        let json = serde_json::to_value(&inputs).unwrap();
        assert_eq!(json, serde_json::json!({"query": {"value": "golang"}}));
    }

    #[test]
    fn test_output_declaration_shape() {
        let json = serde_json::to_value(OutputDeclaration::posted_message_ts("C1")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"name": "C1", "type": "text", "label": OUTPUT_LABEL})
        );
    }
}
