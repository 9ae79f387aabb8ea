//! # News Step CLI
//!
//! Drives the news workflow step from the command line: each subcommand turns
//! a JSON document into one lifecycle event, dispatches it, and prints the
//! step's response on stdout. Logs go to stderr.
//!
//! ## Usage
//!
//! ```sh
//! news_step edit --inputs inputs.json
//! news_step save --state state.json
//! news_step execute --inputs inputs.json --news-api-key KEY --slack-bot-token xoxb-...
//! ```

use clap::Parser;
use news_step::step::StateValues;
use news_step::{NewsApiClient, NewsStep, Settings, SlackClient, StepEvent, StepInputs, StepResponse, dispatch};
use std::error::Error;
use tokio::io::AsyncReadExt;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    let args = Cli::parse();
    debug!(command = ?args.command, config = ?args.config, "Parsed CLI arguments");

    let settings = Settings::load(args.config.as_deref()).await?;

    let event = match &args.command {
        Command::Edit { inputs } => StepEvent::Edit {
            inputs: read_json::<StepInputs>(inputs).await?,
        },
        Command::Save { state } => StepEvent::Save {
            state: read_json::<StateValues>(state).await?,
        },
        Command::Execute { inputs } => {
            if args.news_api_key.is_none() || args.slack_bot_token.is_none() {
                error!("execute needs --news-api-key and --slack-bot-token (or NEWS_API_KEY / SLACK_BOT_TOKEN)");
                return Err("missing credentials for execute".into());
            }
            StepEvent::Execute {
                inputs: read_json::<StepInputs>(inputs).await?,
            }
        }
    };

    // edit and save never reach the network, so empty credentials are fine there
    let step = NewsStep::new(
        NewsApiClient::new(
            &settings.news_api_url,
            args.news_api_key.clone().unwrap_or_default(),
        )?,
        SlackClient::new(
            &settings.slack_api_url,
            args.slack_bot_token.clone().unwrap_or_default(),
        )?,
    )
    .with_display_timezone(settings.display_timezone);

    let response = dispatch(&step, event).await;
    println!("{}", serde_json::to_string_pretty(&response)?);

    let elapsed = start_time.elapsed();
    match response {
        StepResponse::Fail { error } => {
            error!(?elapsed, message = %error.message, "Step failed");
            std::process::exit(1);
        }
        _ => info!(?elapsed, "Step finished"),
    }

    Ok(())
}

/// Read a JSON document from `path`, or from stdin when `path` is `-`.
#[instrument(level = "debug")]
async fn read_json<T: serde::de::DeserializeOwned>(path: &str) -> Result<T, Box<dyn Error>> {
    let text = if path == "-" {
        let mut buf = String::new();
        tokio::io::stdin().read_to_string(&mut buf).await?;
        buf
    } else {
        tokio::fs::read_to_string(path).await?
    };
    Ok(serde_json::from_str(&text)?)
}
