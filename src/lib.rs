//! Voxinput: headless keystroke front end for voice/text clients
//!
//! This library provides:
//! - An input loop that merges an internal command queue and an external
//!   event source (button driver, remote trigger, stdin) without favouring
//!   either
//! - Line accumulation with configurable space/submit/secondary/terminate
//!   trigger tokens
//! - A thread-safe output channel carrying submitted lines and control
//!   events to a consumer on any thread or runtime
//!
//! # Architecture
//!
//! ```text
//!   ┌──────────────┐          ┌──────────────┐
//!   │   Internal   │          │   External   │
//!   │   commands   │          │ event source │
//!   └──────────────┘          └──────────────┘
//!          │                         │
//!          └───────────┬─────────────┘
//!                      ▼  tokio::select!
//!             ┌─────────────────┐
//!             │   Input loop    │  classify ─▶ line buffer
//!             └─────────────────┘
//!                      │ submit / reset / terminate
//!                      ▼
//!             ┌─────────────────┐
//!             │ Output channel  │ ─▶ consumer (any thread)
//!             └─────────────────┘
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod source;
pub mod state;

pub use cli::{Cli, Commands, TokenizeOverride};
pub use config::Config;
pub use error::{InputError, Result, VoxinputError};
pub use input::{CommandSender, ControlCommand, InputHandler};
pub use state::RunState;
