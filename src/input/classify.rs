//! Token classification
//!
//! Maps a token to a control action or to plain text. Tokens that match no
//! trigger are text, so classification never fails.

use crate::config::TriggerConfig;

/// What a token means to the line accumulator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Keystroke {
    /// Append a single space
    Space,
    /// Send the line to the consumer and clear it
    Submit,
    /// Run the secondary action and clear the line
    Secondary,
    /// Stop the input loop
    Terminate,
    /// Append verbatim
    Text(String),
}

/// Classify a token against the configured triggers
///
/// Triggers match the whole token exactly; "enter" submits, "enterprise" is text.
pub fn classify(token: &str, triggers: &TriggerConfig) -> Keystroke {
    if token == triggers.space {
        Keystroke::Space
    } else if token == triggers.submit {
        Keystroke::Submit
    } else if token == triggers.secondary {
        Keystroke::Secondary
    } else if token == triggers.terminate {
        Keystroke::Terminate
    } else if is_single_whitespace(token) {
        Keystroke::Space
    } else {
        Keystroke::Text(token.to_string())
    }
}

/// A token made of exactly one whitespace character (" ", "\t", ...)
fn is_single_whitespace(token: &str) -> bool {
    let mut chars = token.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_whitespace())
}
