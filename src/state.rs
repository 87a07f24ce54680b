//! Run state of the input loop
//!
//! NotStarted → Running → Stopped. Stopped is terminal: a stopped handler
//! cannot be restarted, a new one must be created.

/// Lifetime of the multiplexer loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    /// Handler constructed, loop not spawned yet
    #[default]
    NotStarted,

    /// Loop is accepting events
    Running,

    /// Terminate received or stop requested
    Stopped,
}

impl RunState {
    /// Check if the loop should keep processing events
    pub fn is_running(&self) -> bool {
        matches!(self, RunState::Running)
    }

    /// Check if the loop has been stopped
    pub fn is_stopped(&self) -> bool {
        matches!(self, RunState::Stopped)
    }
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunState::NotStarted => write!(f, "not started"),
            RunState::Running => write!(f, "running"),
            RunState::Stopped => write!(f, "stopped"),
        }
    }
}
