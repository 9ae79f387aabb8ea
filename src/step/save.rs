//! Save callback: submitted form state to persisted inputs and declared outputs.

use super::extract::{Attribute, StateValues, Submitted, extract};
use crate::models::{
    INPUT_CHANNEL_IDS, INPUT_LANGUAGE, INPUT_NUM_ARTICLES, INPUT_QUERY, InputValue,
    OutputDeclaration, StepInputs, StepUpdate,
};
use crate::utils::join_channel_ids;
use tracing::{debug, instrument};

/// Build the [`StepUpdate`] for a form submission.
///
/// Fields that cannot be decoded are stored with a `null` value; only the
/// selected channels produce output declarations.
///
/// # Arguments
///
/// * `state` - Submitted view state, keyed by block id then action id
///
/// # Returns
///
/// The inputs to persist and one output declaration per selected channel.
#[instrument(level = "debug", skip_all)]
pub fn save_inputs(state: &StateValues) -> StepUpdate {
    let channels = extract(state, INPUT_CHANNEL_IDS, Attribute::SelectedChannels)
        .and_then(Submitted::into_channels);
    let query = extract(state, INPUT_QUERY, Attribute::Value).and_then(Submitted::into_text);
    let num_articles = extract(state, INPUT_NUM_ARTICLES, Attribute::SelectedOption)
        .and_then(Submitted::into_text);
    let language =
        extract(state, INPUT_LANGUAGE, Attribute::SelectedOption).and_then(Submitted::into_text);

    debug!(
        ?channels,
        ?query,
        ?num_articles,
        ?language,
        "Extracted submitted values"
    );

    let outputs = channels
        .iter()
        .flatten()
        .map(|channel| OutputDeclaration::posted_message_ts(channel))
        .collect();

    StepUpdate {
        inputs: StepInputs {
            channel_ids: Some(InputValue::new(
                channels.as_deref().map(|ids| join_channel_ids(ids)),
            )),
            query: Some(InputValue::new(query)),
            num_articles: Some(InputValue::new(num_articles)),
            language: Some(InputValue::new(language)),
        },
        outputs,
    }
}
