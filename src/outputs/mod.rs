//! Block Kit output generation.
//!
//! # Submodules
//!
//! - [`message`]: renders one [`crate::models::Article`] as a channel message
//! - [`form`]: builds the step's configuration form for the edit callback

pub mod form;
pub mod message;
