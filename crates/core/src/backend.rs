//! The seam between the dialogue controller and its processing backends
//!
//! A backend supplies its persona texts, decides what a greeted user's
//! utterance asks for, and serves commands.

use crate::error::BackendError;
use crate::types::{CommandKind, Reply};

/// What a backend makes of an utterance once the user has greeted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recognition {
    /// Open a slot: the next utterance is the command's input
    Pending { command: CommandKind, prompt: String },
    /// Serve the command with this same utterance (no slot)
    Immediate(CommandKind),
    /// The command exists but cannot run right now
    Unavailable { message: String },
    /// Nothing recognized
    Help { message: String },
}

pub trait Backend: Send + Sync {
    /// Shown when the session starts
    fn welcome(&self, assistant_name: &str) -> String;

    /// Shown after the first greeting
    fn onboarding(&self) -> String;

    fn recognize(&self, normalized: &str) -> Recognition;

    /// Run a command over the user's text
    fn process(&self, command: CommandKind, text: &str) -> Result<Reply, BackendError>;
}
