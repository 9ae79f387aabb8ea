//! # News Step
//!
//! A Slack workflow step that fetches recent news articles matching a keyword
//! query from [News API](https://newsapi.org) and posts each one as a Block Kit
//! message to one or more channels.
//!
//! ## Lifecycle
//!
//! 1. **Edit**: the user opens the step and gets a form (language, number of
//!    articles, channels, query), pre-filled with the saved configuration
//! 2. **Save**: the submitted form becomes the step's persisted inputs, and one
//!    output variable is declared per channel
//! 3. **Execute**: when the workflow runs, articles are fetched and posted to
//!    every channel; the step completes with the posted message timestamps or
//!    fails with a readable reason
//!
//! ## Usage
//!
//! ```ignore
//! use news_step::{NewsApiClient, NewsStep, SlackClient, StepEvent, dispatch};
//!
//! let step = NewsStep::new(
//!     NewsApiClient::new("https://newsapi.org", news_api_key)?,
//!     SlackClient::new("https://slack.com/api/", bot_token)?,
//! );
//! let response = dispatch(&step, event).await;
//! ```

pub mod api;
pub mod blocks;
pub mod config;
pub mod error;
pub mod models;
pub mod outputs;
pub mod slack;
pub mod step;
pub mod utils;

pub use api::{ArticleSource, NewsApiClient};
pub use config::{CALLBACK_ID, Settings};
pub use error::{FetchError, PostError, StepFailure};
pub use models::{Article, Language, StepInputs, StepOutputs, StepUpdate};
pub use outputs::message::format_article;
pub use slack::{MessagePoster, SlackClient};
pub use step::{NewsStep, StepEvent, StepResponse, WorkflowStep, dispatch};
