//! Configuration loading and types for voxinput
//!
//! Configuration is loaded in layers:
//! 1. Built-in defaults
//! 2. Config file (~/.config/voxinput/config.toml)
//! 3. Environment variables (VOXINPUT_*)
//! 4. CLI arguments (highest priority)

use crate::error::VoxinputError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file content
pub const DEFAULT_CONFIG: &str = r#"# Voxinput Configuration
#
# Location: ~/.config/voxinput/config.toml
# All settings can be overridden via CLI flags

[triggers]
# Token that appends a single space to the line
space = "space"

# Token that submits the current line to the consumer
submit = "enter"

# Token that runs the secondary action and clears the line
secondary = "r"

# Token that shuts the input loop down
terminate = "q"

[input]
# Forward every appended text unit to the consumer as it is typed
echo = false

# Maximum line length in characters (omit for no limit)
# Keystrokes that would overflow the line are dropped
# max_line_length = 4096

# Secondary action: "none" (just clears the line) or "notify"
# (clears the line and sends a reset event to the consumer)
secondary_action = "none"

[source]
# How stdin is split into tokens:
# - line: each line is one token ("enter", "space", "h", ...)
# - char: each character is one token; space and newline map to
#   the space and submit triggers
tokenize = "line"

# Number of stdin tokens buffered before the reader thread waits
capacity = 64

# Send the terminate trigger when stdin reaches end of file
terminate_on_eof = true
"#;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub triggers: TriggerConfig,

    #[serde(default)]
    pub input: InputConfig,

    #[serde(default)]
    pub source: SourceConfig,
}

/// Token values that map to control actions instead of text
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct TriggerConfig {
    #[serde(default = "default_space_trigger")]
    pub space: String,

    #[serde(default = "default_submit_trigger")]
    pub submit: String,

    #[serde(default = "default_secondary_trigger")]
    pub secondary: String,

    #[serde(default = "default_terminate_trigger")]
    pub terminate: String,
}

/// What the secondary trigger does besides clearing the line
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SecondaryActionKind {
    /// Clear the line only
    #[default]
    None,
    /// Clear the line and send a reset event to the consumer
    Notify,
}

/// Line accumulation settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InputConfig {
    /// Forward appended text units to the consumer as raw events
    #[serde(default)]
    pub echo: bool,

    /// Maximum line length in characters
    #[serde(default)]
    pub max_line_length: Option<usize>,

    #[serde(default)]
    pub secondary_action: SecondaryActionKind,
}

/// How stdin is split into tokens
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TokenizeMode {
    /// One token per line
    #[default]
    Line,
    /// One token per character
    Char,
}

/// External event source settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourceConfig {
    #[serde(default)]
    pub tokenize: TokenizeMode,

    /// Channel capacity between the reader thread and the input loop
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// Send the terminate trigger when the source reaches end of file
    #[serde(default = "default_true")]
    pub terminate_on_eof: bool,
}

fn default_space_trigger() -> String {
    "space".to_string()
}

fn default_submit_trigger() -> String {
    "enter".to_string()
}

fn default_secondary_trigger() -> String {
    "r".to_string()
}

fn default_terminate_trigger() -> String {
    "q".to_string()
}

fn default_capacity() -> usize {
    64
}

fn default_true() -> bool {
    true
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            space: default_space_trigger(),
            submit: default_submit_trigger(),
            secondary: default_secondary_trigger(),
            terminate: default_terminate_trigger(),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            echo: false,
            max_line_length: None,
            secondary_action: SecondaryActionKind::None,
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            tokenize: TokenizeMode::Line,
            capacity: default_capacity(),
            terminate_on_eof: true,
        }
    }
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "voxinput")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Check that trigger tokens are usable
    pub fn validate(&self) -> Result<(), VoxinputError> {
        let triggers = [
            ("space", &self.triggers.space),
            ("submit", &self.triggers.submit),
            ("secondary", &self.triggers.secondary),
            ("terminate", &self.triggers.terminate),
        ];

        for (i, (name, token)) in triggers.iter().enumerate() {
            if token.is_empty() {
                return Err(VoxinputError::Config(format!(
                    "Trigger '{}' must not be empty",
                    name
                )));
            }
            if let Some((other, _)) = triggers[i + 1..].iter().find(|(_, t)| t == token) {
                return Err(VoxinputError::Config(format!(
                    "Triggers '{}' and '{}' share the token {:?}",
                    name, other, token
                )));
            }
        }

        if self.source.capacity == 0 {
            return Err(VoxinputError::Config(
                "source.capacity must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

/// Load configuration from file, with defaults for missing values
pub fn load_config(path: Option<&Path>) -> Result<Config, VoxinputError> {
    let mut config = Config::default();

    let config_path = path.map(PathBuf::from).or_else(Config::default_path);

    if let Some(ref path) = config_path {
        if path.exists() {
            tracing::debug!("Loading config from {:?}", path);
            let contents = std::fs::read_to_string(path)
                .map_err(|e| VoxinputError::Config(format!("Failed to read config: {}", e)))?;

            config = toml::from_str(&contents)
                .map_err(|e| VoxinputError::Config(format!("Invalid config: {}", e)))?;
        } else {
            tracing::debug!("Config file not found at {:?}, using defaults", path);
        }
    }

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());

    Ok(config)
}

/// Override config values from VOXINPUT_* environment variables
fn apply_env_overrides(config: &mut Config, var: impl Fn(&str) -> Option<String>) {
    if let Some(submit) = var("VOXINPUT_SUBMIT") {
        config.triggers.submit = submit;
    }
    if let Some(terminate) = var("VOXINPUT_TERMINATE") {
        config.triggers.terminate = terminate;
    }
    if let Some(mode) = var("VOXINPUT_TOKENIZE") {
        config.source.tokenize = match mode.to_lowercase().as_str() {
            "char" => TokenizeMode::Char,
            "line" => TokenizeMode::Line,
            other => {
                tracing::warn!(
                    "Unknown VOXINPUT_TOKENIZE value {:?}, keeping {:?}",
                    other,
                    config.source.tokenize
                );
                config.source.tokenize
            }
        };
    }
}
