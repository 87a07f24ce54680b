//! Error types for voxinput
//!
//! Uses thiserror for ergonomic error definitions with clear messages.

use thiserror::Error;

/// Top-level error type for the voxinput application
#[derive(Error, Debug)]
pub enum VoxinputError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Input error: {0}")]
    Input(#[from] InputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by the input handler and its event sources
#[derive(Error, Debug)]
pub enum InputError {
    #[error("Failed to handle event '{token}': {reason}")]
    Handler { token: String, reason: String },

    #[error("Output channel closed, could not deliver {0}")]
    Dispatch(String),

    #[error("Input buffer full ({limit} characters), dropped '{token}'")]
    BufferFull { limit: usize, token: String },

    #[error("Secondary action failed: {0}")]
    SecondaryAction(String),

    #[error("Input handler already started")]
    AlreadyStarted,

    #[error("Input handler has been stopped and cannot be restarted")]
    Stopped,

    #[error("Input loop task failed: {0}")]
    Join(String),
}

/// Result type alias using VoxinputError
pub type Result<T> = std::result::Result<T, VoxinputError>;
