//! Line input core
//!
//! Merges an internal command stream and an external event source into one
//! sequential loop, accumulates text into a line buffer, and hands control
//! commands (submit, reset, terminate) to a consumer over an output channel.
//!
//! ```text
//!   submit_command() ──▶ internal queue ─┐
//!                                        ├─▶ multiplexer ─▶ classify ─▶ buffer
//!   EventSource::next_event() ───────────┘                     │
//!                                                              ▼
//!                                               output channel ─▶ consumer
//! ```

pub mod action;
pub mod buffer;
pub mod classify;
pub mod handler;

pub use action::{create_action, NoopAction, NotifyAction, SecondaryAction};
pub use buffer::InputBuffer;
pub use classify::{classify, Keystroke};
pub use handler::{CommandSender, InputHandler};

use serde::{Deserialize, Serialize};

/// A locally generated command, queued through [`InputHandler::submit_command`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternalCommand {
    /// Command token, classified exactly like an external signal
    pub kind: String,
    /// Optional payload, carried for diagnostics only
    pub data: Option<String>,
}

impl InternalCommand {
    pub fn new(kind: impl Into<String>, data: Option<String>) -> Self {
        Self {
            kind: kind.into(),
            data,
        }
    }
}

/// An event from either source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// From the internal command queue
    Internal(InternalCommand),
    /// From the external event source (button, remote trigger, stdin)
    External(String),
}

impl Event {
    /// The token used for classification
    pub fn token(&self) -> &str {
        match self {
            Event::Internal(cmd) => &cmd.kind,
            Event::External(signal) => signal,
        }
    }

    /// Short source name for logs
    pub fn source(&self) -> &'static str {
        match self {
            Event::Internal(_) => "internal",
            Event::External(_) => "external",
        }
    }
}

/// Commands delivered to the consumer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ControlCommand {
    /// A finished line
    Submit { text: String },
    /// The line was discarded by the secondary action
    Reset,
    /// The input loop is shutting down
    Terminate,
    /// A text unit appended to the line (echo mode)
    Raw { text: String },
}

impl std::fmt::Display for ControlCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ControlCommand::Submit { text } => write!(f, "submit {:?}", text),
            ControlCommand::Reset => write!(f, "reset"),
            ControlCommand::Terminate => write!(f, "terminate"),
            ControlCommand::Raw { text } => write!(f, "raw {:?}", text),
        }
    }
}
