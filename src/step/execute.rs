//! Execute callback: fetch articles and post them to every configured channel.
//!
//! Posting is sequential, articles × channels. The output for a channel is the
//! timestamp of the last message posted there.

use crate::api::ArticleSource;
use crate::error::{PostError, StepFailure};
use crate::models::{Article, StepInputs, StepOutputs};
use crate::outputs::message::{format_article_in, no_articles_notice};
use crate::slack::{MessagePoster, PostMessage};
use chrono_tz::Tz;
use std::time::Instant;
use tracing::{error, info, instrument};

/// Run one execution of the step.
///
/// Any failure before posting (bad inputs, fetch error) posts nothing. A send
/// failure aborts the run and discards the outputs gathered so far.
///
/// # Arguments
///
/// * `source` - Where articles come from
/// * `poster` - Where messages go
/// * `display_tz` - Zone the article timestamps are rendered in
/// * `inputs` - The saved step configuration
///
/// # Returns
///
/// The `ts` of the last message posted to each channel, keyed by channel id.
///
/// # Errors
///
/// A [`StepFailure`] carrying the fetch or notification message.
#[instrument(level = "info", skip_all)]
pub async fn execute_inputs<S, P>(
    source: &S,
    poster: &P,
    display_tz: Tz,
    inputs: &StepInputs,
) -> Result<StepOutputs, StepFailure>
where
    S: ArticleSource,
    P: MessagePoster,
{
    let t0 = Instant::now();

    let resolved = inputs.resolve().map_err(|e| {
        error!(error = %e, "Invalid step inputs");
        StepFailure::fetch(e)
    })?;
    let articles = source
        .fetch_articles(&resolved.article_query)
        .await
        .map_err(|e| {
            error!(error = %e, "Fetching articles failed");
            StepFailure::fetch(e)
        })?;

    info!(
        articles = articles.len(),
        channels = resolved.channels.len(),
        "Posting articles"
    );

    let outputs = post_articles(
        poster,
        display_tz,
        &articles,
        &resolved.channels,
        &resolved.article_query.query,
    )
    .await
    .map_err(|e| {
        error!(error = %e, "Posting failed");
        StepFailure::notification(e)
    })?;

    info!(
        elapsed_ms = t0.elapsed().as_millis() as u64,
        outputs = outputs.len(),
        "Step execution complete"
    );
    Ok(outputs)
}

async fn post_articles<P: MessagePoster>(
    poster: &P,
    display_tz: Tz,
    articles: &[Article],
    channels: &[String],
    query: &str,
) -> Result<StepOutputs, PostError> {
    let mut outputs = StepOutputs::new();

    if articles.is_empty() {
        let notice = no_articles_notice(query);
        for channel in channels {
            let posted = poster
                .post_message(&PostMessage::text(channel, &notice))
                .await?;
            outputs.insert(channel.clone(), posted.ts);
        }
        return Ok(outputs);
    }

    for article in articles {
        let blocks = format_article_in(article, display_tz);
        for channel in channels {
            let message = PostMessage::blocks(channel, blocks.clone(), &article.title);
            let posted = poster.post_message(&message).await?;
            outputs.insert(channel.clone(), posted.ts);
        }
    }
    Ok(outputs)
}
