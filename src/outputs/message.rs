//! Channel message rendering for fetched articles.
//!
//! Every article becomes exactly four blocks:
//!
//! ```text
//! [0] header   – title
//! [1] context  – "⏱ YYYY-MM-DD HH:MM:SS " in the display timezone
//! [2] section  – description, with the article image as accessory if any
//! [3] context  – "全文を読む：<url>"
//! ```

use crate::blocks::{Accessory, Block, Text};
use crate::config::DISPLAY_TIMEZONE;
use crate::models::Article;
use chrono_tz::Tz;

pub const IMAGE_ALT_TEXT: &str = "ニュース記事の画像";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Render `article` with its timestamp in [`DISPLAY_TIMEZONE`].
pub fn format_article(article: &Article) -> Vec<Block> {
    format_article_in(article, DISPLAY_TIMEZONE)
}

/// Render `article` with its timestamp in `display_tz`.
pub fn format_article_in(article: &Article, display_tz: Tz) -> Vec<Block> {
    let published = article
        .published_at
        .with_timezone(&display_tz)
        .format(TIMESTAMP_FORMAT);

    // no image: the section goes out without an accessory at all
    let accessory = (!article.image_url.is_empty()).then(|| Accessory::Image {
        image_url: article.image_url.clone(),
        alt_text: IMAGE_ALT_TEXT.to_string(),
    });

    vec![
        Block::Header {
            text: Text::plain(&article.title),
        },
        Block::Context {
            elements: vec![Text::mrkdwn(format!("⏱ {published} "))],
        },
        Block::Section {
            text: Text::mrkdwn(&article.description),
            accessory,
        },
        Block::Context {
            elements: vec![Text::mrkdwn(format!("全文を読む：{}", article.url))],
        },
    ]
}

/// Text posted instead of articles when the search came back empty.
pub fn no_articles_notice(query: &str) -> String {
    format!("現在「{query}」に一致する記事はありません。")
}
