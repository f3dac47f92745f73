//! Kitchen timer console host.
//!
//! Hosts one countdown timer on a cooperative scheduler:
//! - derived values are published to stdout sinks
//! - lifecycle events go to the log
//! - actions are read line by line from stdin
//! - an in-process peer stands in for the home-automation side

use std::io::Write;

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, oneshot};

use kitchen_timer::cli::{Cli, Commands, ConsoleCommand, RunArgs};
use kitchen_timer::peer::SharedPeer;
use kitchen_timer::scheduler::{Scheduler, SchedulerRequest};
use kitchen_timer::sink::{ConsoleSink, Sinks};
use kitchen_timer::sync::SyncPublisher;
use kitchen_timer::timer::TimerCore;
use kitchen_timer::types::TimerAction;

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize logging
    init_tracing();

    // Parse command line arguments
    let cli = Cli::parse();

    // Execute command
    if let Err(e) = execute(cli).await {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("kitchen_timer=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Run(args)) => {
            run_timer(args).await?;
        }
        Some(Commands::Completions { shell }) => {
            generate_completions(shell);
        }
        None => {
            // No command provided, show help
            Cli::command().print_help()?;
        }
    }

    Ok(())
}

/// Runs the timer until the console quits, stdin closes, or ctrl-c.
async fn run_timer(args: RunArgs) -> Result<()> {
    let config = args.to_config();
    config.validate().context("invalid timer configuration")?;

    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let (request_tx, request_rx) = mpsc::unbounded_channel();

    let peer = SharedPeer::new();
    let sinks = Sinks::new()
        .with_state(Box::new(ConsoleSink::new("state")))
        .with_remaining_seconds(Box::new(ConsoleSink::new("remaining_seconds")))
        .with_set_seconds(Box::new(ConsoleSink::new("set_seconds")))
        .with_running(Box::new(ConsoleSink::new("running")))
        .with_paused(Box::new(ConsoleSink::new("paused")))
        .with_overdue(Box::new(ConsoleSink::new("overdue")));

    let core = TimerCore::new(config.clone(), event_tx);
    let mut publisher = SyncPublisher::new(sinks);
    if config.enable_ha_sync {
        publisher = publisher.with_peer(Box::new(peer.clone()));
    }

    let scheduler = Scheduler::new(core, publisher, event_rx, request_rx);
    let scheduler_task = tokio::spawn(scheduler.run());

    run_console(&request_tx, &peer).await?;

    // Closing the request channel tells the scheduler to stop
    drop(request_tx);
    scheduler_task.await.context("scheduler task failed")?;

    Ok(())
}

/// Reads console lines until quit, EOF, or ctrl-c.
async fn run_console(
    request_tx: &mpsc::UnboundedSender<SchedulerRequest>,
    peer: &SharedPeer,
) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line.context("failed to read from stdin")? {
                    Some(line) => {
                        if !handle_line(&line, request_tx, peer).await? {
                            break;
                        }
                    }
                    // EOF behaves like quit, so piped scripts stop cleanly
                    None => break,
                }
            }
            _ = tokio::signal::ctrl_c() => {
                break;
            }
        }
    }

    Ok(())
}

/// Handles one console line. Returns false when the console should close.
async fn handle_line(
    line: &str,
    request_tx: &mpsc::UnboundedSender<SchedulerRequest>,
    peer: &SharedPeer,
) -> Result<bool> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(true);
    }

    let command = match ConsoleCommand::parse(line) {
        Ok(command) => command,
        Err(err) => {
            // clap renders help requests and usage errors alike
            print!("{err}");
            std::io::stdout()
                .flush()
                .context("failed to flush console output")?;
            return Ok(true);
        }
    };

    match command {
        ConsoleCommand::Start { seconds } => {
            send_action(request_tx, TimerAction::Start { seconds })?;
        }
        ConsoleCommand::Pause => {
            send_action(request_tx, TimerAction::Pause)?;
        }
        ConsoleCommand::Resume => {
            send_action(request_tx, TimerAction::Resume)?;
        }
        ConsoleCommand::Cancel => {
            send_action(request_tx, TimerAction::Cancel)?;
        }
        ConsoleCommand::Set { seconds } => {
            send_action(request_tx, TimerAction::SetSeconds { seconds })?;
        }
        ConsoleCommand::Status => {
            let (reply_tx, reply_rx) = oneshot::channel();
            request_tx
                .send(SchedulerRequest::Query(reply_tx))
                .map_err(|_| anyhow!("timer is not running"))?;
            let snapshot = reply_rx.await.context("timer stopped before replying")?;
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        ConsoleCommand::Ha { state, remaining } => {
            // A bare state change keeps the peer's last remaining value,
            // the way a dashboard button would
            let remaining = remaining.unwrap_or_else(|| peer.current().1);
            peer.drive(state, remaining);
        }
        ConsoleCommand::Quit => return Ok(false),
    }

    Ok(true)
}

/// Forwards a timer action to the scheduling task.
fn send_action(
    request_tx: &mpsc::UnboundedSender<SchedulerRequest>,
    action: TimerAction,
) -> Result<()> {
    request_tx
        .send(SchedulerRequest::Action(action))
        .map_err(|_| anyhow!("timer is not running"))
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================
