// Command-line interface definitions for voxinput
//
// This module is separate so it can be used by both the binary (main.rs)
// and build.rs for generating man pages.

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "voxinput")]
#[command(author, version, about = "Headless keystroke front end for voice/text clients")]
#[command(long_about = "
Voxinput collects keystroke tokens from stdin (or a scripted command list),
accumulates them into a line, and emits control events when a trigger
token arrives.

TOKENS (defaults, see `voxinput config`):
  space   append a space
  enter   submit the current line
  r       secondary action, clears the line
  q       shut down

Any other token is appended to the line verbatim.

EXAMPLES:
  printf 'h\\ni\\nenter\\nq\\n' | voxinput
  voxinput --tokenize char --json
  voxinput --script h,i,enter
")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<std::path::PathBuf>,

    /// Increase verbosity (-v = debug, -vv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Print every appended text unit as it arrives
    #[arg(long)]
    pub echo: bool,

    /// Print events as JSON lines
    #[arg(long)]
    pub json: bool,

    /// How stdin is split into tokens
    #[arg(long, value_enum, value_name = "MODE")]
    pub tokenize: Option<TokenizeOverride>,

    /// Override the submit trigger token
    #[arg(long, value_name = "TOKEN")]
    pub submit: Option<String>,

    /// Override the terminate trigger token
    #[arg(long, value_name = "TOKEN")]
    pub terminate: Option<String>,

    /// Comma-separated internal commands queued at startup (e.g. "h,i,enter")
    #[arg(long, value_name = "TOKENS", value_delimiter = ',')]
    pub script: Vec<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Read tokens and emit events (default if no command specified)
    Run,

    /// Show current configuration
    Config,
}

/// Stdin tokenization override
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TokenizeOverride {
    /// One token per line
    Line,
    /// One token per character
    Char,
}
