//! Secondary action hook
//!
//! Runs when the secondary trigger arrives, before the line is cleared.
//! Applications plug in their own behaviour (refresh, alternate mode, ...);
//! the default does nothing.

use super::ControlCommand;
use crate::config::SecondaryActionKind;
use crate::error::InputError;

/// Trait for secondary action implementations
#[async_trait::async_trait]
pub trait SecondaryAction: Send {
    /// Run the action with the line that is about to be discarded
    ///
    /// A returned command is forwarded to the consumer.
    async fn run(&mut self, line: &str) -> Result<Option<ControlCommand>, InputError>;
}

/// Clears the line and nothing else
#[derive(Debug, Default)]
pub struct NoopAction;

#[async_trait::async_trait]
impl SecondaryAction for NoopAction {
    async fn run(&mut self, line: &str) -> Result<Option<ControlCommand>, InputError> {
        tracing::debug!("Secondary action, discarding {:?}", line);
        Ok(None)
    }
}

/// Tells the consumer the line was discarded
#[derive(Debug, Default)]
pub struct NotifyAction;

#[async_trait::async_trait]
impl SecondaryAction for NotifyAction {
    async fn run(&mut self, line: &str) -> Result<Option<ControlCommand>, InputError> {
        tracing::debug!("Secondary action, resetting {:?}", line);
        Ok(Some(ControlCommand::Reset))
    }
}

/// Factory function to create the configured secondary action
pub fn create_action(kind: SecondaryActionKind) -> Box<dyn SecondaryAction> {
    match kind {
        SecondaryActionKind::None => Box::new(NoopAction),
        SecondaryActionKind::Notify => Box::new(NotifyAction),
    }
}
