//! Configuration form shown when a user edits the step.
//!
//! The form has four input blocks, in this order: language, number of
//! articles, target channels, search query. Values saved earlier are used as
//! initial state so re-editing starts from the current configuration.

use crate::blocks::{Block, Element, OptionObject, Text};
use crate::models::{
    INPUT_CHANNEL_IDS, INPUT_LANGUAGE, INPUT_NUM_ARTICLES, INPUT_QUERY, InputValue, StepInputs,
};
use crate::utils::split_channel_ids;

/// Action id shared by every form element.
pub const ACTION_ID: &str = "_";

const LANGUAGE_OPTIONS: [(&str, &str); 2] = [("日本語", "jp"), ("英語", "en")];

const NUM_ARTICLE_OPTIONS: [(&str, &str); 3] = [("1 件", "1"), ("3 件", "3"), ("5 件", "5")];

const QUERY_PLACEHOLDER: &str = "例：東証、テレワーク（カンマ / 読点区切りで複数指定可能）";

/// Build the edit form, pre-populated from `inputs`.
///
/// # Arguments
///
/// * `inputs` - The configuration saved so far; empty for a new step
///
/// # Returns
///
/// The four input blocks in display order.
pub fn edit_form(inputs: &StepInputs) -> Vec<Block> {
    vec![
        radio_block(
            INPUT_LANGUAGE,
            "言語",
            &LANGUAGE_OPTIONS,
            saved_value(&inputs.language),
        ),
        radio_block(
            INPUT_NUM_ARTICLES,
            "最大記事数",
            &NUM_ARTICLE_OPTIONS,
            saved_value(&inputs.num_articles),
        ),
        Block::Input {
            block_id: INPUT_CHANNEL_IDS.to_string(),
            label: Text::plain("通知したいチャンネル"),
            optional: false,
            element: Element::MultiChannelsSelect {
                action_id: ACTION_ID.to_string(),
                placeholder: Text::plain("複数選択可能"),
                initial_channels: saved_value(&inputs.channel_ids).map(split_channel_ids),
            },
        },
        Block::Input {
            block_id: INPUT_QUERY.to_string(),
            label: Text::plain("検索条件（指定しない場合は全記事から最新を取得）"),
            optional: true,
            element: Element::PlainTextInput {
                action_id: ACTION_ID.to_string(),
                placeholder: Text::plain(QUERY_PLACEHOLDER),
                initial_value: saved_value(&inputs.query).map(str::to_string),
            },
        },
    ]
}

fn saved_value(input: &Option<InputValue>) -> Option<&str> {
    input.as_ref().and_then(|v| v.value.as_deref())
}

fn radio_block(
    block_id: &str,
    label: &str,
    choices: &[(&str, &str)],
    saved: Option<&str>,
) -> Block {
    let options: Vec<OptionObject> = choices
        .iter()
        .map(|(text, value)| OptionObject::new(text, value))
        .collect();
    // a stored value outside the fixed choices leaves the group unselected
    let initial_option = saved.and_then(|saved| options.iter().find(|o| o.value == saved).cloned());

    Block::Input {
        block_id: block_id.to_string(),
        label: Text::plain(label),
        optional: false,
        element: Element::RadioButtons {
            action_id: ACTION_ID.to_string(),
            options,
            initial_option,
        },
    }
}
