//! Input handler: multiplexer loop, line accumulation, and dispatch
//!
//! The handler owns two event sources and one output channel. `start()`
//! spawns a single task that races the internal command queue against the
//! external source with `tokio::select!`; ready branches are picked at
//! random, so neither source can starve the other, and both receivers are
//! cancel-safe, so the losing branch never drops an event.
//!
//! All buffer mutation happens inside that task, one event at a time.
//! Producers (threads feeding the external source, callers of
//! `submit_command`) only ever touch channels.

use super::action::{create_action, SecondaryAction};
use super::buffer::InputBuffer;
use super::classify::{classify, Keystroke};
use super::{ControlCommand, Event, InternalCommand};
use crate::config::{Config, TriggerConfig};
use crate::error::InputError;
use crate::source::EventSource;
use crate::state::RunState;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// Cloneable handle for queueing internal commands from any thread
#[derive(Debug, Clone)]
pub struct CommandSender {
    tx: mpsc::UnboundedSender<InternalCommand>,
}

impl CommandSender {
    /// Queue a command; classified exactly like an external token
    pub fn submit_command(
        &self,
        kind: impl Into<String>,
        data: Option<String>,
    ) -> Result<(), InputError> {
        self.tx
            .send(InternalCommand::new(kind, data))
            .map_err(|_| InputError::Stopped)
    }
}

/// Sources and hooks moved into the loop task on start
struct Pending {
    command_rx: mpsc::UnboundedReceiver<InternalCommand>,
    external: Box<dyn EventSource>,
    action: Box<dyn SecondaryAction>,
}

/// Headless line input handler
pub struct InputHandler {
    config: Config,
    commands: CommandSender,
    output_tx: mpsc::UnboundedSender<ControlCommand>,
    state: Arc<watch::Sender<RunState>>,
    pending: Option<Pending>,
    task: Option<JoinHandle<Result<(), InputError>>>,
}

impl InputHandler {
    /// Create a handler reading external tokens from `external`
    ///
    /// Returns the handler and the consumer end of the output channel. The
    /// receiver may be polled from any runtime, or with `blocking_recv`
    /// from a plain thread.
    pub fn new<S>(config: &Config, external: S) -> (Self, mpsc::UnboundedReceiver<ControlCommand>)
    where
        S: EventSource + 'static,
    {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (output_tx, output_rx) = mpsc::unbounded_channel();
        let (state, _) = watch::channel(RunState::NotStarted);

        let handler = Self {
            config: config.clone(),
            commands: CommandSender { tx: command_tx },
            output_tx,
            state: Arc::new(state),
            pending: Some(Pending {
                command_rx,
                external: Box::new(external),
                action: create_action(config.input.secondary_action),
            }),
            task: None,
        };

        (handler, output_rx)
    }

    /// Replace the secondary action (only before start)
    pub fn with_action(mut self, action: Box<dyn SecondaryAction>) -> Self {
        if let Some(pending) = self.pending.as_mut() {
            pending.action = action;
        }
        self
    }

    /// Spawn the input loop on the current tokio runtime
    ///
    /// Returns immediately. A handler runs at most once: starting twice, or
    /// after `stop()`, is an error.
    pub fn start(&mut self) -> Result<(), InputError> {
        if self.state.borrow().is_stopped() {
            return Err(InputError::Stopped);
        }
        let pending = self.pending.take().ok_or(InputError::AlreadyStarted)?;

        self.state.send_replace(RunState::Running);

        let input_loop = InputLoop {
            triggers: self.config.triggers.clone(),
            echo: self.config.input.echo,
            buffer: InputBuffer::with_limit(self.config.input.max_line_length),
            command_rx: pending.command_rx,
            external: pending.external,
            action: pending.action,
            output_tx: self.output_tx.clone(),
            state_rx: self.state.subscribe(),
            state: Arc::clone(&self.state),
        };

        self.task = Some(tokio::spawn(input_loop.run()));
        tracing::debug!("Input loop spawned");
        Ok(())
    }

    /// Request shutdown; the loop exits at its next iteration
    pub fn stop(&self) {
        let changed = self.state.send_if_modified(|state| {
            if state.is_stopped() {
                false
            } else {
                *state = RunState::Stopped;
                true
            }
        });
        if changed {
            tracing::info!("Stopping input loop");
        }
    }

    /// Wait for the loop task to finish
    ///
    /// Surfaces a failure to deliver `Terminate`. Returns immediately if the
    /// loop was never started.
    pub async fn join(&mut self) -> Result<(), InputError> {
        match self.task.take() {
            Some(task) => task.await.map_err(|e| InputError::Join(e.to_string()))?,
            None => Ok(()),
        }
    }

    /// Queue an internal command
    pub fn submit_command(
        &self,
        kind: impl Into<String>,
        data: Option<String>,
    ) -> Result<(), InputError> {
        self.commands.submit_command(kind, data)
    }

    /// Handle for queueing commands from other threads or tasks
    pub fn command_sender(&self) -> CommandSender {
        self.commands.clone()
    }

    /// Current run state
    pub fn state(&self) -> RunState {
        *self.state.borrow()
    }

    /// Watch run state transitions
    pub fn subscribe_state(&self) -> watch::Receiver<RunState> {
        self.state.subscribe()
    }
}

impl std::fmt::Debug for InputHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputHandler")
            .field("state", &self.state())
            .field("triggers", &self.config.triggers)
            .finish_non_exhaustive()
    }
}

/// State owned by the spawned loop task
struct InputLoop {
    triggers: TriggerConfig,
    echo: bool,
    buffer: InputBuffer,
    command_rx: mpsc::UnboundedReceiver<InternalCommand>,
    external: Box<dyn EventSource>,
    action: Box<dyn SecondaryAction>,
    output_tx: mpsc::UnboundedSender<ControlCommand>,
    state_rx: watch::Receiver<RunState>,
    state: Arc<watch::Sender<RunState>>,
}

impl InputLoop {
    async fn run(mut self) -> Result<(), InputError> {
        tracing::info!(
            "Input loop running (submit: {:?}, terminate: {:?})",
            self.triggers.submit,
            self.triggers.terminate
        );

        let mut internal_open = true;
        let mut external_open = true;

        let result = loop {
            if !self.state_rx.borrow_and_update().is_running() {
                tracing::debug!("Stop observed");
                break Ok(());
            }
            if !internal_open && !external_open {
                tracing::info!("All event sources closed");
                break Ok(());
            }

            // Once the external source is exhausted, drain what is already
            // queued internally and end. The handler keeps its own sender,
            // so the internal queue never closes on its own.
            let event = if !external_open {
                match self.command_rx.try_recv() {
                    Ok(command) => Event::Internal(command),
                    Err(_) => {
                        tracing::info!("External event source closed, internal queue drained");
                        break Ok(());
                    }
                }
            } else {
                tokio::select! {
                    command = self.command_rx.recv(), if internal_open => match command {
                        Some(command) => Event::Internal(command),
                        None => {
                            tracing::debug!("Internal command queue closed");
                            internal_open = false;
                            continue;
                        }
                    },
                    signal = self.external.next_event() => match signal {
                        Some(signal) => Event::External(signal),
                        None => {
                            tracing::debug!("External event source closed");
                            external_open = false;
                            continue;
                        }
                    },
                    _ = self.state_rx.changed() => continue,
                }
            };

            if let Event::Internal(InternalCommand {
                data: Some(data), ..
            }) = &event
            {
                tracing::trace!("Internal command data: {:?}", data);
            }

            let keystroke = classify(event.token(), &self.triggers);
            tracing::trace!("{} event {:?} -> {:?}", event.source(), event.token(), keystroke);

            if keystroke == Keystroke::Terminate {
                tracing::info!("Terminate received from {} source", event.source());
                self.state.send_replace(RunState::Stopped);
                break self.dispatch(ControlCommand::Terminate);
            }

            if let Err(e) = self.handle(keystroke).await {
                tracing::warn!("Dropped {} event: {}", event.source(), e);
            }
        };

        self.state.send_replace(RunState::Stopped);
        tracing::info!("Input loop stopped");
        result
    }

    /// Apply one non-terminate keystroke to the line
    async fn handle(&mut self, keystroke: Keystroke) -> Result<(), InputError> {
        match keystroke {
            Keystroke::Space => {
                self.buffer.push_space()?;
                self.echo_unit(" ")
            }
            Keystroke::Text(unit) => {
                self.buffer.push_str(&unit)?;
                self.echo_unit(&unit)
            }
            Keystroke::Submit => {
                let text = self.buffer.take();
                tracing::info!("User input: {:?}", text);
                self.dispatch(ControlCommand::Submit { text })
            }
            Keystroke::Secondary => {
                let result = self.action.run(self.buffer.as_str()).await;
                self.buffer.clear();
                match result? {
                    Some(command) => self.dispatch(command),
                    None => Ok(()),
                }
            }
            Keystroke::Terminate => Err(InputError::Handler {
                token: self.triggers.terminate.clone(),
                reason: "terminate is handled by the loop".to_string(),
            }),
        }
    }

    fn echo_unit(&self, unit: &str) -> Result<(), InputError> {
        if self.echo {
            self.dispatch(ControlCommand::Raw {
                text: unit.to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Non-blocking hand-off to the consumer
    fn dispatch(&self, command: ControlCommand) -> Result<(), InputError> {
        self.output_tx
            .send(command)
            .map_err(|e| InputError::Dispatch(e.0.to_string()))
    }
}
