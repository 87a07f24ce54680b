//! Stdin event source
//!
//! Reads tokens on a dedicated OS thread and hands them to the input loop
//! through a bounded channel. Reading stdin blocks, so it never runs on the
//! async runtime.

use super::EventSource;
use crate::config::{SourceConfig, TokenizeMode, TriggerConfig};
use std::io::BufRead;
use tokio::sync::mpsc;

/// Token source fed by a reader thread
pub struct StdinSource {
    rx: mpsc::Receiver<String>,
}

impl StdinSource {
    /// Start reading tokens from the process stdin
    pub fn spawn(config: &SourceConfig, triggers: &TriggerConfig) -> std::io::Result<Self> {
        Self::from_reader(std::io::BufReader::new(std::io::stdin()), config, triggers)
    }

    /// Start reading tokens from any buffered reader
    pub fn from_reader<R>(
        reader: R,
        config: &SourceConfig,
        triggers: &TriggerConfig,
    ) -> std::io::Result<Self>
    where
        R: BufRead + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(config.capacity);
        let mode = config.tokenize;
        let terminate_on_eof = config.terminate_on_eof;
        let triggers = triggers.clone();

        std::thread::Builder::new()
            .name("voxinput-stdin".to_string())
            .spawn(move || {
                if reader_loop(reader, mode, &triggers, &tx) && terminate_on_eof {
                    tracing::debug!("Stdin closed, sending terminate");
                    let _ = tx.blocking_send(triggers.terminate.clone());
                }
            })?;

        Ok(Self { rx })
    }
}

#[async_trait::async_trait]
impl EventSource for StdinSource {
    async fn next_event(&mut self) -> Option<String> {
        self.rx.recv().await
    }
}

/// Main reader loop running on the stdin thread
///
/// Returns true when the reader reached end of input, false when the input
/// loop went away first.
fn reader_loop<R: BufRead>(
    reader: R,
    mode: TokenizeMode,
    triggers: &TriggerConfig,
    tx: &mpsc::Sender<String>,
) -> bool {
    tracing::debug!("Reading tokens from stdin ({:?} mode)", mode);

    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!("Failed to read stdin: {}", e);
                break;
            }
        };

        for token in tokenize(&line, mode, triggers) {
            if tx.blocking_send(token).is_err() {
                tracing::debug!("Input loop gone, stdin reader stopping");
                return false;
            }
        }
    }

    true
}

/// Split one input line into tokens
///
/// `lines()` strips the newline, so in char mode the line end is turned
/// back into the submit trigger.
fn tokenize(line: &str, mode: TokenizeMode, triggers: &TriggerConfig) -> Vec<String> {
    let line = line.trim_end_matches('\r');

    match mode {
        TokenizeMode::Line => {
            if line.is_empty() {
                Vec::new()
            } else {
                vec![line.to_string()]
            }
        }
        TokenizeMode::Char => line
            .chars()
            .map(|c| match c {
                ' ' => triggers.space.clone(),
                c => c.to_string(),
            })
            .chain(std::iter::once(triggers.submit.clone()))
            .collect(),
    }
}
