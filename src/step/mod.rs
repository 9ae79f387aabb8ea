//! The news workflow step and its lifecycle.
//!
//! A workflow step goes through three events, each handled by one method of
//! [`WorkflowStep`]:
//!
//! | Event | Trigger | Result |
//! |-------|---------|--------|
//! | edit | user opens the step's configuration | form blocks to render |
//! | save | user submits the form | persisted inputs + declared outputs |
//! | execute | the workflow runs the step | per-channel outputs, or a failure |
//!
//! Returning from `edit` or `save` acknowledges the event. The step keeps no
//! state between calls: everything it needs arrives with the event.
//!
//! Embedding applications either call the trait methods directly or route
//! deserialized [`StepEvent`]s through [`dispatch`].

pub mod execute;
pub mod extract;
pub mod save;

use crate::api::ArticleSource;
use crate::blocks::Block;
use crate::config::{CALLBACK_ID, DISPLAY_TIMEZONE};
use crate::error::StepFailure;
use crate::models::{OutputDeclaration, StepInputs, StepOutputs, StepUpdate};
use crate::outputs::form::edit_form;
use crate::slack::MessagePoster;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

pub use extract::StateValues;

/// A configurable workflow step.
#[allow(async_fn_in_trait)]
pub trait WorkflowStep {
    /// Identifier the host routes this step's events by.
    fn callback_id(&self) -> &str {
        CALLBACK_ID
    }

    /// Build the configuration form, or `None` to acknowledge without one.
    fn edit(&self, inputs: &StepInputs) -> Option<Vec<Block>>;

    /// Turn a form submission into inputs and output declarations.
    fn save(&self, state: &StateValues) -> StepUpdate;

    /// Run the step with its persisted inputs.
    async fn execute(&self, inputs: &StepInputs) -> Result<StepOutputs, StepFailure>;
}

/// An event delivered by the host framework.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum StepEvent {
    Edit {
        #[serde(default)]
        inputs: StepInputs,
    },
    Save {
        state: StateValues,
    },
    Execute {
        #[serde(default)]
        inputs: StepInputs,
    },
}

/// The continuation the host should apply for an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "response", rename_all = "snake_case")]
pub enum StepResponse {
    /// Acknowledged, nothing to render.
    Ack,
    Configure {
        blocks: Vec<Block>,
    },
    Update {
        inputs: StepInputs,
        outputs: Vec<OutputDeclaration>,
    },
    Complete {
        outputs: StepOutputs,
    },
    Fail {
        error: StepFailure,
    },
}

/// Route `event` to the matching method of `step`.
#[instrument(level = "info", skip_all, fields(callback_id = step.callback_id()))]
pub async fn dispatch<W: WorkflowStep>(step: &W, event: StepEvent) -> StepResponse {
    match event {
        StepEvent::Edit { inputs } => match step.edit(&inputs) {
            Some(blocks) => StepResponse::Configure { blocks },
            None => StepResponse::Ack,
        },
        StepEvent::Save { state } => {
            let StepUpdate { inputs, outputs } = step.save(&state);
            StepResponse::Update { inputs, outputs }
        }
        StepEvent::Execute { inputs } => match step.execute(&inputs).await {
            Ok(outputs) => StepResponse::Complete { outputs },
            Err(error) => StepResponse::Fail { error },
        },
    }
}

/// Fetches news through `S` and posts it through `P`.
#[derive(Debug)]
pub struct NewsStep<S, P> {
    source: S,
    poster: P,
    display_timezone: Tz,
}

impl<S, P> NewsStep<S, P>
where
    S: ArticleSource,
    P: MessagePoster,
{
    pub fn new(source: S, poster: P) -> Self {
        Self {
            source,
            poster,
            display_timezone: DISPLAY_TIMEZONE,
        }
    }

    /// Render article timestamps in `tz` instead of [`DISPLAY_TIMEZONE`].
    pub fn with_display_timezone(mut self, tz: Tz) -> Self {
        self.display_timezone = tz;
        self
    }
}

impl<S, P> WorkflowStep for NewsStep<S, P>
where
    S: ArticleSource,
    P: MessagePoster,
{
    fn edit(&self, inputs: &StepInputs) -> Option<Vec<Block>> {
        info!("Building configuration form");
        Some(edit_form(inputs))
    }

    fn save(&self, state: &StateValues) -> StepUpdate {
        let update = save::save_inputs(state);
        info!(outputs = update.outputs.len(), "Saved step inputs");
        update
    }

    async fn execute(&self, inputs: &StepInputs) -> Result<StepOutputs, StepFailure> {
        execute::execute_inputs(&self.source, &self.poster, self.display_timezone, inputs).await
    }
}
