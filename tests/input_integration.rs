//! End-to-end tests for the input handler using channel-backed sources
//!
//! These drive the public API the way an embedding application does: an
//! external token channel, internal commands, and a consumer reading the
//! output channel.

use std::time::Duration;
use tokio::sync::mpsc;
use voxinput::config::{Config, SecondaryActionKind};
use voxinput::{ControlCommand, InputError, InputHandler, RunState};

const TIMEOUT: Duration = Duration::from_secs(5);

/// Start a handler wired to an unbounded external channel
fn start_handler(
    config: &Config,
) -> (
    InputHandler,
    mpsc::UnboundedReceiver<ControlCommand>,
    mpsc::UnboundedSender<String>,
) {
    let (external_tx, external_rx) = mpsc::unbounded_channel();
    let (mut handler, output) = InputHandler::new(config, external_rx);
    handler.start().unwrap();
    (handler, output, external_tx)
}

fn echo_config() -> Config {
    let mut config = Config::default();
    config.input.echo = true;
    config
}

async fn next(output: &mut mpsc::UnboundedReceiver<ControlCommand>) -> ControlCommand {
    tokio::time::timeout(TIMEOUT, output.recv())
        .await
        .expect("timed out waiting for output")
        .expect("output channel closed")
}

fn submit(text: &str) -> ControlCommand {
    ControlCommand::Submit {
        text: text.to_string(),
    }
}

fn raw_text(command: ControlCommand) -> String {
    match command {
        ControlCommand::Raw { text } => text,
        other => panic!("expected raw event, got {:?}", other),
    }
}

// ============================================================================
// Line accumulation
// ============================================================================

#[tokio::test]
async fn external_tokens_submit_line() {
    let (mut handler, mut output, external) = start_handler(&Config::default());

    for token in ["h", "i", " ", "enter"] {
        external.send(token.to_string()).unwrap();
    }

    assert_eq!(next(&mut output).await, submit("hi "));

    handler.stop();
    handler.join().await.unwrap();
}

#[tokio::test]
async fn any_single_whitespace_token_appends_a_space() {
    let (mut handler, mut output, _external) = start_handler(&Config::default());

    for token in ["h", "i", "\t", "enter"] {
        handler.submit_command(token, None).unwrap();
    }

    assert_eq!(next(&mut output).await, submit("hi "));

    handler.stop();
    handler.join().await.unwrap();
}

#[tokio::test]
async fn closed_external_source_ends_loop() {
    let (mut handler, mut output, external) = start_handler(&Config::default());

    external.send("a".to_string()).unwrap();
    drop(external);

    tokio::time::timeout(TIMEOUT, handler.join())
        .await
        .expect("loop kept running after its external source closed")
        .unwrap();
    assert_eq!(handler.state(), RunState::Stopped);

    drop(handler);
    assert_eq!(output.recv().await, None);
}

#[tokio::test]
async fn consecutive_lines_start_empty() {
    let (mut handler, mut output, external) = start_handler(&Config::default());

    for token in ["a", "enter", "b", "space", "c", "enter", "enter"] {
        external.send(token.to_string()).unwrap();
    }

    assert_eq!(next(&mut output).await, submit("a"));
    assert_eq!(next(&mut output).await, submit("b c"));
    assert_eq!(next(&mut output).await, submit(""));

    handler.stop();
    handler.join().await.unwrap();
}

#[tokio::test]
async fn secondary_trigger_discards_line() {
    let mut config = Config::default();
    config.input.secondary_action = SecondaryActionKind::Notify;
    let (mut handler, mut output, external) = start_handler(&config);

    for token in ["x", "y", "r", "z", "enter"] {
        external.send(token.to_string()).unwrap();
    }

    assert_eq!(next(&mut output).await, ControlCommand::Reset);
    assert_eq!(next(&mut output).await, submit("z"));

    handler.stop();
    handler.join().await.unwrap();
}

// ============================================================================
// Termination and lifecycle
// ============================================================================

#[tokio::test]
async fn terminate_stops_loop_without_submit() {
    let (mut handler, mut output, external) = start_handler(&Config::default());

    for token in ["t", "e", "r", "m", "i", "n", "a", "t", "q", "late", "enter"] {
        external.send(token.to_string()).unwrap();
    }

    assert_eq!(next(&mut output).await, ControlCommand::Terminate);
    tokio::time::timeout(TIMEOUT, handler.join())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(handler.state(), RunState::Stopped);

    // Tokens after the terminate trigger were never handled
    drop(handler);
    assert_eq!(output.recv().await, None);
}

#[tokio::test]
async fn stop_ends_idle_loop() {
    let (mut handler, mut output, _external) = start_handler(&Config::default());
    let mut state = handler.subscribe_state();
    assert_eq!(*state.borrow(), RunState::Running);

    handler.stop();
    tokio::time::timeout(TIMEOUT, state.wait_for(|s| s.is_stopped()))
        .await
        .unwrap()
        .unwrap();
    tokio::time::timeout(TIMEOUT, handler.join())
        .await
        .unwrap()
        .unwrap();

    // The loop is gone, so queued commands have nowhere to go
    assert!(matches!(
        handler.submit_command("a", None),
        Err(InputError::Stopped)
    ));
    drop(handler);
    assert_eq!(output.recv().await, None);
}

#[tokio::test]
async fn terminate_with_dropped_consumer_is_reported() {
    let (mut handler, output, external) = start_handler(&Config::default());
    drop(output);

    external.send("q".to_string()).unwrap();

    let result = tokio::time::timeout(TIMEOUT, handler.join()).await.unwrap();
    assert!(matches!(result, Err(InputError::Dispatch(_))));
}

// ============================================================================
// Source equivalence and fairness
// ============================================================================

#[tokio::test]
async fn internal_and_external_sources_are_equivalent() {
    let tokens = ["o", "k", "space", "r", "g", "o", "enter"];

    let (mut internal_handler, mut internal_output, _external) =
        start_handler(&Config::default());
    for token in tokens {
        internal_handler.submit_command(token, None).unwrap();
    }

    let (mut external_handler, mut external_output, external) =
        start_handler(&Config::default());
    for token in tokens {
        external.send(token.to_string()).unwrap();
    }

    let from_internal = next(&mut internal_output).await;
    let from_external = next(&mut external_output).await;
    assert_eq!(from_internal, submit("go"));
    assert_eq!(from_internal, from_external);

    internal_handler.stop();
    external_handler.stop();
    internal_handler.join().await.unwrap();
    external_handler.join().await.unwrap();
}

#[tokio::test]
async fn interleaved_sources_keep_both_units() {
    let (mut handler, mut output, external) = start_handler(&echo_config());

    handler.submit_command("a", None).unwrap();
    external.send("b".to_string()).unwrap();

    // Wait until both units are in the line before submitting
    let mut seen = vec![raw_text(next(&mut output).await), raw_text(next(&mut output).await)];
    seen.sort();
    assert_eq!(seen, vec!["a", "b"]);

    handler.submit_command("enter", None).unwrap();
    match next(&mut output).await {
        ControlCommand::Submit { text } => assert!(text == "ab" || text == "ba", "got {:?}", text),
        other => panic!("expected submit, got {:?}", other),
    }

    handler.stop();
    handler.join().await.unwrap();
}

#[tokio::test]
async fn simultaneously_ready_sources_lose_nothing() {
    const COUNT: usize = 200;

    let (external_tx, external_rx) = mpsc::unbounded_channel();
    let (mut handler, mut output) = InputHandler::new(&echo_config(), external_rx);

    // Both queues are full before the loop starts
    for i in 0..COUNT {
        handler.submit_command(format!("i{}", i), None).unwrap();
        external_tx.send(format!("e{}", i)).unwrap();
    }
    handler.start().unwrap();

    let mut internal = Vec::new();
    let mut external = Vec::new();
    for _ in 0..COUNT * 2 {
        let unit = raw_text(next(&mut output).await);
        if unit.starts_with('i') {
            internal.push(unit);
        } else {
            external.push(unit);
        }
    }

    // Each source arrives complete and in its own FIFO order
    let expected_internal: Vec<String> = (0..COUNT).map(|i| format!("i{}", i)).collect();
    let expected_external: Vec<String> = (0..COUNT).map(|i| format!("e{}", i)).collect();
    assert_eq!(internal, expected_internal);
    assert_eq!(external, expected_external);

    handler.stop();
    handler.join().await.unwrap();
}

#[tokio::test]
async fn busy_external_source_does_not_starve_internal() {
    const BACKLOG: usize = 500;

    let (external_tx, external_rx) = mpsc::unbounded_channel();
    let (mut handler, mut output) = InputHandler::new(&echo_config(), external_rx);

    for _ in 0..BACKLOG {
        external_tx.send("x".to_string()).unwrap();
    }
    handler.submit_command("!", None).unwrap();
    handler.start().unwrap();

    let mut position = None;
    for i in 0..=BACKLOG {
        if raw_text(next(&mut output).await) == "!" {
            position = Some(i);
            break;
        }
    }

    let position = position.expect("internal command never processed");
    assert!(
        position < BACKLOG,
        "internal command waited for the whole external backlog"
    );

    handler.stop();
    handler.join().await.unwrap();
}

// ============================================================================
// Cross-thread hand-off
// ============================================================================

#[test]
fn consumer_and_producer_on_plain_threads() {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .unwrap();

    let (external_tx, external_rx) = mpsc::channel::<String>(8);
    let (mut handler, mut output) = InputHandler::new(&Config::default(), external_rx);

    runtime.block_on(async { handler.start() }).unwrap();

    // A driver thread, like a physical button reader, feeding the source
    let producer = std::thread::spawn(move || {
        for token in ["h", "e", "y", "enter", "q"] {
            external_tx.blocking_send(token.to_string()).unwrap();
        }
    });

    // The consumer reads from outside the runtime
    let consumer = std::thread::spawn(move || {
        let mut received = Vec::new();
        while let Some(command) = output.blocking_recv() {
            let done = command == ControlCommand::Terminate;
            received.push(command);
            if done {
                break;
            }
        }
        received
    });

    producer.join().unwrap();
    let received = consumer.join().unwrap();
    assert_eq!(received, vec![submit("hey"), ControlCommand::Terminate]);

    runtime.block_on(handler.join()).unwrap();
    assert_eq!(handler.state(), RunState::Stopped);
}

#[tokio::test]
async fn command_sender_works_from_other_threads() {
    let (mut handler, mut output, _external) = start_handler(&Config::default());
    let sender = handler.command_sender();

    std::thread::spawn(move || {
        for token in ["f", "r", "o", "m", "enter"] {
            sender.submit_command(token, Some("thread".to_string())).unwrap();
        }
    })
    .join()
    .unwrap();

    // "r" is the secondary trigger and clears "f"
    assert_eq!(next(&mut output).await, submit("om"));

    handler.stop();
    handler.join().await.unwrap();
}
