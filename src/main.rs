//! Voxinput - headless keystroke front end for voice/text clients
//!
//! Run with `voxinput` or `voxinput run` to read tokens from stdin.
//! Use `voxinput config` to show the effective configuration.

use clap::Parser;
use std::io::Write;
use tokio::signal::unix::{signal, SignalKind};
use tracing_subscriber::EnvFilter;
use voxinput::config::{self, Config, TokenizeMode};
use voxinput::input::{ControlCommand, InputHandler};
use voxinput::source::StdinSource;
use voxinput::{Cli, Commands, TokenizeOverride};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("voxinput={},warn", log_level))),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Load configuration
    let mut config = config::load_config(cli.config.as_deref())?;

    // Apply CLI overrides
    if cli.echo {
        config.input.echo = true;
    }
    if let Some(mode) = cli.tokenize {
        config.source.tokenize = match mode {
            TokenizeOverride::Line => TokenizeMode::Line,
            TokenizeOverride::Char => TokenizeMode::Char,
        };
    }
    if let Some(submit) = cli.submit {
        config.triggers.submit = submit;
    }
    if let Some(terminate) = cli.terminate {
        config.triggers.terminate = terminate;
    }
    config.validate()?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            run(config, cli.script, cli.json).await?;
        }

        Commands::Config => {
            show_config(&config)?;
        }
    }

    Ok(())
}

/// Read stdin tokens until terminate, EOF, or a signal
async fn run(config: Config, script: Vec<String>, json: bool) -> anyhow::Result<()> {
    let source = StdinSource::spawn(&config.source, &config.triggers)?;
    let (mut handler, mut output) = InputHandler::new(&config, source);

    // The consumer lives on its own thread, outside the runtime
    let consumer = std::thread::Builder::new()
        .name("voxinput-output".to_string())
        .spawn(move || {
            while let Some(command) = output.blocking_recv() {
                if let Err(e) = print_command(&command, json) {
                    tracing::error!("Failed to write output: {}", e);
                    break;
                }
                if command == ControlCommand::Terminate {
                    break;
                }
            }
        })?;

    let mut sigterm = signal(SignalKind::terminate())?;

    // Queued before start so an already-closed stdin cannot end the loop first
    for token in script {
        handler.submit_command(token, None)?;
    }
    handler.start()?;

    let mut state = handler.subscribe_state();
    tokio::select! {
        _ = state.wait_for(|state| state.is_stopped()) => {}
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received SIGINT, shutting down...");
            handler.stop();
        }
        _ = sigterm.recv() => {
            tracing::info!("Received SIGTERM, shutting down...");
            handler.stop();
        }
    }

    handler.join().await?;

    // Last sender goes with the handler, which ends the consumer
    drop(handler);
    consumer
        .join()
        .map_err(|_| anyhow::anyhow!("Output thread panicked"))?;

    Ok(())
}

fn print_command(command: &ControlCommand, json: bool) -> std::io::Result<()> {
    let mut stdout = std::io::stdout().lock();

    if json {
        let line = serde_json::to_string(command)?;
        writeln!(stdout, "{}", line)?;
        return stdout.flush();
    }

    match command {
        ControlCommand::Submit { text } => writeln!(stdout, "{}", text)?,
        ControlCommand::Raw { text } => write!(stdout, "{}", text)?,
        ControlCommand::Reset => writeln!(stdout, "[reset]")?,
        ControlCommand::Terminate => tracing::debug!("Consumer received terminate"),
    }
    stdout.flush()
}

fn show_config(config: &Config) -> anyhow::Result<()> {
    println!("Current Configuration\n");
    println!("=====================\n");

    println!("{}", toml::to_string_pretty(config)?);

    match Config::default_path() {
        Some(path) => println!("# Config file: {:?}", path),
        None => println!("# Config file: (no config directory)"),
    }

    Ok(())
}
