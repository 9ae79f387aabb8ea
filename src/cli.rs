//! Command-line interface definitions for the news step.
//!
//! Each subcommand feeds one lifecycle event to the step and prints the
//! resulting response as JSON on stdout. Secrets can be provided via flags or
//! environment variables.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments for the news step driver.
///
/// # Examples
///
/// ```sh
/// # Render the configuration form for previously saved inputs
/// news_step edit --inputs inputs.json
///
/// # Turn a submitted view state into inputs and outputs
/// news_step save --state state.json
///
/// # Fetch and post, reading inputs from stdin
/// NEWS_API_KEY=... SLACK_BOT_TOKEN=xoxb-... news_step execute < inputs.json
/// ```
#[derive(Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to config.yaml file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// News API key (required for `execute`)
    #[arg(long, env = "NEWS_API_KEY", global = true, hide_env_values = true)]
    pub news_api_key: Option<String>,

    /// Slack bot token (required for `execute`)
    #[arg(long, env = "SLACK_BOT_TOKEN", global = true, hide_env_values = true)]
    pub slack_bot_token: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Print the configuration form for saved step inputs
    Edit {
        /// JSON file with the saved inputs, `-` for stdin
        #[arg(short, long, default_value = "-")]
        inputs: String,
    },
    /// Convert a submitted view state into step inputs and outputs
    Save {
        /// JSON file with `view.state.values`, `-` for stdin
        #[arg(short, long, default_value = "-")]
        state: String,
    },
    /// Fetch articles and post them to the configured channels
    Execute {
        /// JSON file with the saved inputs, `-` for stdin
        #[arg(short, long, default_value = "-")]
        inputs: String,
    },
}
