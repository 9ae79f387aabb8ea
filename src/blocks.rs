//! Slack Block Kit descriptors.
//!
//! Only the block and element types this step produces are modeled. Each enum
//! is internally tagged on `type`, so serializing a value yields exactly the
//! JSON Slack expects, e.g. `{"type":"header","text":{"type":"plain_text","text":"..."}}`.
//! Optional members are omitted from the JSON when unset.

use serde::{Deserialize, Serialize};

/// A text object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Text {
    PlainText { text: String },
    Mrkdwn { text: String },
}

impl Text {
    pub fn plain(text: impl Into<String>) -> Self {
        Text::PlainText { text: text.into() }
    }

    pub fn mrkdwn(text: impl Into<String>) -> Self {
        Text::Mrkdwn { text: text.into() }
    }

    pub fn text(&self) -> &str {
        match self {
            Text::PlainText { text } | Text::Mrkdwn { text } => text,
        }
    }
}

/// One choice of a radio button group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionObject {
    pub text: Text,
    pub value: String,
}

impl OptionObject {
    pub fn new(label: &str, value: &str) -> Self {
        Self {
            text: Text::plain(label),
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Accessory {
    Image { image_url: String, alt_text: String },
}

/// Interactive element of an `input` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Element {
    RadioButtons {
        action_id: String,
        options: Vec<OptionObject>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        initial_option: Option<OptionObject>,
    },
    MultiChannelsSelect {
        action_id: String,
        placeholder: Text,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        initial_channels: Option<Vec<String>>,
    },
    PlainTextInput {
        action_id: String,
        placeholder: Text,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        initial_value: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Header {
        text: Text,
    },
    Context {
        elements: Vec<Text>,
    },
    Section {
        text: Text,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        accessory: Option<Accessory>,
    },
    Input {
        block_id: String,
        label: Text,
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        optional: bool,
        element: Element,
    },
}
