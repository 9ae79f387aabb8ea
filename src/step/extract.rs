//! Decoding of submitted form state.
//!
//! Slack reports a submitted view as `state.values[block_id][action_id]`, an
//! object whose interesting attribute depends on the element type:
//!
//! | Element | Attribute | Shape |
//! |---------|-----------|-------|
//! | `plain_text_input` | `value` | string or `null` |
//! | `radio_buttons` | `selected_option` | `{ "value": ... }` or `null` |
//! | `multi_channels_select` | `selected_channels` | array of strings |
//!
//! [`extract`] maps each shape to a [`Submitted`] variant and anything else to
//! `None`, which callers store as a `null` input.

use crate::outputs::form::ACTION_ID;
use serde_json::Value;
use std::collections::HashMap;

/// `view.state.values`: block id → action id → element state.
pub type StateValues = HashMap<String, HashMap<String, Value>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    Value,
    SelectedOption,
    SelectedChannels,
}

impl Attribute {
    pub fn key(&self) -> &'static str {
        match self {
            Attribute::Value => "value",
            Attribute::SelectedOption => "selected_option",
            Attribute::SelectedChannels => "selected_channels",
        }
    }
}

/// A decoded form value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submitted {
    /// A bare string, e.g. typed text.
    Plain(String),
    /// The `value` of a selected option object.
    Choice(String),
    /// A list of selected ids.
    Channels(Vec<String>),
}

impl Submitted {
    pub fn into_text(self) -> Option<String> {
        match self {
            Submitted::Plain(s) | Submitted::Choice(s) => Some(s),
            Submitted::Channels(_) => None,
        }
    }

    pub fn into_channels(self) -> Option<Vec<String>> {
        match self {
            Submitted::Channels(ids) => Some(ids),
            Submitted::Plain(_) | Submitted::Choice(_) => None,
        }
    }
}

/// Read `attribute` of the field `block_id` from submitted state.
///
/// Returns `None` when the field or attribute is absent, `null`, or of an
/// unexpected shape.
pub fn extract(state: &StateValues, block_id: &str, attribute: Attribute) -> Option<Submitted> {
    let field = state.get(block_id)?.get(ACTION_ID)?;
    decode(field.get(attribute.key())?)
}

fn decode(value: &Value) -> Option<Submitted> {
    match value {
        Value::String(s) => Some(Submitted::Plain(s.clone())),
        Value::Array(items) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>()
            .map(Submitted::Channels),
        Value::Object(option) => option
            .get("value")
            .and_then(Value::as_str)
            .map(|s| Submitted::Choice(s.to_string())),
        Value::Null | Value::Bool(_) | Value::Number(_) => None,
    }
}
