//! StudyDaemon - AGS study tracker daemon
//!
//! CLI entry point for the report daemon, the sync server, and manual
//! planner commands.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Local;
use clap::Parser;
use eyre::{Context, Result};
use tracing::{debug, info, warn};

use studycore::domain::Task;
use studycore::{Command as DomainCommand, Event, StateDiff};
use studydaemon::cli::{Cli, Command, OutputFormat, TaskCommand};
use studydaemon::config::Config;
use studydaemon::notify::{Notifier, TelegramNotifier};
use studydaemon::reporter::{self, Reporter, ReportSlot};
use studydaemon::server::{self, AppCtx};
use studydaemon::state::{SnapshotStore, StateManager};
use studydaemon::trigger::ReportTrigger;

fn setup_logging(verbose: u8, config_log_level: Option<&str>) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("studydaemon")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Level priority: -v flags > config file > INFO
    let level = match verbose {
        0 => match config_log_level.map(|s| s.to_uppercase()).as_deref() {
            Some("TRACE") => tracing::Level::TRACE,
            Some("DEBUG") => tracing::Level::DEBUG,
            Some("INFO") | None => tracing::Level::INFO,
            Some("WARN") | Some("WARNING") => tracing::Level::WARN,
            Some("ERROR") => tracing::Level::ERROR,
            Some(other) => {
                eprintln!("Warning: Unknown log level '{}', defaulting to INFO", other);
                tracing::Level::INFO
            }
        },
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    let log_file =
        fs::File::create(log_dir.join("studydaemon.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load log level from config file early (before full config load)
    let config_log_level = Config::load_log_level(cli.config.as_ref());

    setup_logging(cli.verbose, config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    config.validate()?;

    debug!("main: dispatching command");
    match cli.command {
        Command::Serve => {
            debug!("main: matched Serve command");
            run_daemon(&config).await
        }
        Command::Report { slot, send } => {
            debug!(%slot, send, "main: matched Report command");
            cmd_report(&config, slot, send).await
        }
        Command::Status { format } => {
            debug!(?format, "main: matched Status command");
            cmd_status(&config, format).await
        }
        Command::Task { command } => {
            debug!(?command, "main: matched Task command");
            match command {
                TaskCommand::Add {
                    title,
                    date,
                    kind,
                    subject,
                } => cmd_task_add(&config, title, date, kind, subject).await,
                TaskCommand::List { all } => cmd_task_list(&config, all).await,
                TaskCommand::Done { id } => cmd_task_done(&config, id).await,
            }
        }
    }
}

fn spawn_state(config: &Config) -> StateManager {
    StateManager::spawn(SnapshotStore::new(config.store.path.clone()))
}

/// Run the trigger loop and the sync server until signalled
async fn run_daemon(config: &Config) -> Result<()> {
    debug!("run_daemon: called");
    config.validate_delivery()?;

    let state_manager = spawn_state(config);
    info!("Snapshot store at {}", config.store.path.display());

    let notifier: Arc<dyn Notifier> = Arc::new(TelegramNotifier::from_config(&config.telegram)?);
    let reporter = Reporter::new(state_manager.clone(), notifier);

    let trigger = ReportTrigger::new(&config.reports, reporter.clone())?;
    let trigger_handle = tokio::spawn(trigger.run());

    let ctx = AppCtx {
        state: state_manager.clone(),
        reporter,
        reports: config.reports.clone(),
    };
    let server_config = config.server.clone();
    let server_handle = tokio::spawn(async move {
        if let Err(e) = server::run_server(ctx, &server_config).await {
            tracing::error!(error = %e, "Sync server error");
        }
    });

    info!("Daemon running. Press Ctrl+C to stop.");

    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut sigint = signal(SignalKind::interrupt())?;
        let mut sigterm = signal(SignalKind::terminate())?;

        tokio::select! {
            _ = sigint.recv() => {
                warn!("SIGINT received");
            }
            _ = sigterm.recv() => {
                warn!("SIGTERM received");
            }
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
        debug!("run_daemon: ctrl_c received, initiating shutdown");
    }

    info!("Daemon shutting down...");
    trigger_handle.abort();
    server_handle.abort();
    state_manager.shutdown().await?;
    Ok(())
}

/// Build one report slot, printing or delivering it
async fn cmd_report(config: &Config, slot: ReportSlot, send: bool) -> Result<()> {
    debug!(%slot, send, "cmd_report: called");
    let state_manager = spawn_state(config);
    let today = Local::now().date_naive();

    if send {
        config.validate_delivery()?;
        let notifier: Arc<dyn Notifier> = Arc::new(TelegramNotifier::from_config(&config.telegram)?);
        let reporter = Reporter::new(state_manager.clone(), notifier);

        let outcome = reporter.run_slot(slot, today).await;
        println!("Report {}: {}", slot, outcome.as_str());
    } else {
        match reporter::build_slot(&state_manager, slot, today).await {
            Some(text) => println!("{}", text),
            None => println!("Report {}: nothing to say today", slot),
        }
    }

    state_manager.shutdown().await?;
    Ok(())
}

/// Show today's summary
async fn cmd_status(config: &Config, format: OutputFormat) -> Result<()> {
    debug!(?format, "cmd_status: called");
    let state_manager = spawn_state(config);

    let snapshot = state_manager.get().await?;
    let today = Local::now().date_naive();

    match snapshot {
        None => match format {
            OutputFormat::Json => {
                let json = serde_json::json!({ "status": "no-data" });
                println!("{}", serde_json::to_string_pretty(&json)?);
            }
            OutputFormat::Text => {
                println!("No study data yet. Sync the app or add a task first.");
            }
        },
        Some(snapshot) => {
            let analysis = studycore::analyzer::analyze(&snapshot, today);

            match format {
                OutputFormat::Json => {
                    let json = serde_json::json!({
                        "status": "ok",
                        "today": today.to_string(),
                        "summary": {
                            "overdue": analysis.overdue.len(),
                            "dueToday": analysis.due_today.len(),
                            "doneToday": analysis.done_today.len(),
                            "allClear": analysis.all_clear,
                        },
                    });
                    println!("{}", serde_json::to_string_pretty(&json)?);
                }
                OutputFormat::Text => {
                    println!("Study status for {}", today);
                    println!("--------------------------");
                    println!("Overdue:    {}", analysis.overdue.len());
                    println!("Due today:  {}", analysis.due_today.len());
                    println!("Done today: {}", analysis.done_today.len());
                    println!("All clear:  {}", if analysis.all_clear { "yes" } else { "no" });
                }
            }
        }
    }

    state_manager.shutdown().await?;
    Ok(())
}

/// Add a planner task
async fn cmd_task_add(
    config: &Config,
    title: String,
    date: Option<chrono::NaiveDate>,
    kind: studycore::domain::TaskKind,
    subject: Option<String>,
) -> Result<()> {
    debug!(%title, ?date, "cmd_task_add: called");
    let state_manager = spawn_state(config);
    let date = date.unwrap_or_else(|| Local::now().date_naive());

    let (events, _state) = state_manager
        .apply(DomainCommand::AddTask {
            title,
            kind,
            date,
            subject,
            topic: None,
            duration: None,
        })
        .await?;

    if let Some(Event::TaskAdded { id, title }) = events.first() {
        println!("Added task: {} ({})", title, id);
        println!("Due: {}", date);
    }

    state_manager.shutdown().await?;
    Ok(())
}

/// List planner tasks
async fn cmd_task_list(config: &Config, all: bool) -> Result<()> {
    debug!(all, "cmd_task_list: called");
    let state_manager = spawn_state(config);

    let snapshot = state_manager.get().await?.unwrap_or_default();
    let mut tasks: Vec<&Task> = snapshot
        .tasks
        .iter()
        .filter(|t| all || !t.completed)
        .collect();
    tasks.sort_by_key(|t| t.date);

    if tasks.is_empty() {
        println!("No tasks.");
    } else {
        println!("{:<12} {:<8} {:<6} {:<36} ID", "DATE", "KIND", "DONE", "TITLE");
        for task in tasks {
            println!(
                "{:<12} {:<8} {:<6} {:<36} {}",
                task.date.to_string(),
                task.kind.to_string(),
                if task.completed { "yes" } else { "no" },
                task.title,
                task.id
            );
        }
    }

    state_manager.shutdown().await?;
    Ok(())
}

/// Toggle a task done, announcing completions
async fn cmd_task_done(config: &Config, id: String) -> Result<()> {
    debug!(%id, "cmd_task_done: called");
    let state_manager = spawn_state(config);

    let (events, state) = state_manager
        .apply(DomainCommand::ToggleTask { id: id.clone() })
        .await?;

    match events.first() {
        Some(Event::TaskCompleted { title, .. }) => {
            println!("Completed: {}", title);

            // Completion notice is best effort; an unconfigured bot only
            // costs the celebration message
            match TelegramNotifier::from_config(&config.telegram) {
                Ok(notifier) => {
                    if let Some(task) = state.tasks.iter().find(|t| t.id == id) {
                        let diff = StateDiff {
                            completed_tasks: vec![task.clone()],
                            ..Default::default()
                        };
                        Reporter::new(state_manager.clone(), Arc::new(notifier))
                            .run_sync_notices(&diff)
                            .await;
                    }
                }
                Err(e) => warn!("Completion notice skipped: {}", e),
            }
        }
        Some(Event::TaskReopened { title, .. }) => {
            println!("Reopened: {}", title);
        }
        _ => {}
    }

    state_manager.shutdown().await?;
    Ok(())
}
