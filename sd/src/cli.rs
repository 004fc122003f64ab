//! Command-line interface definitions

use crate::reporter::ReportSlot;
use chrono::NaiveDate;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;
use studycore::domain::TaskKind;

/// Study tracker daemon: Telegram discipline reports and app sync
#[derive(Parser)]
#[command(name = "sd")]
#[command(about = "Study tracker daemon: Telegram discipline reports and app sync")]
#[command(version)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the daemon: report trigger and sync server
    Serve,

    /// Build one report slot now
    Report {
        /// Slot to run (morning, midday, evening)
        slot: ReportSlot,

        /// Deliver via Telegram instead of printing
        #[arg(long)]
        send: bool,
    },

    /// Show today's progress summary
    Status {
        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Manage planner tasks
    Task {
        #[command(subcommand)]
        command: TaskCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum TaskCommand {
    /// Add a task
    Add {
        /// Task title
        title: String,

        /// Due date (YYYY-MM-DD), today when omitted
        #[arg(short, long)]
        date: Option<NaiveDate>,

        /// Task kind (video, soru, tekrar, diger)
        #[arg(short, long, default_value = "diger")]
        kind: TaskKind,

        /// Subject name
        #[arg(short, long)]
        subject: Option<String>,
    },

    /// List tasks
    List {
        /// Include completed tasks
        #[arg(long)]
        all: bool,
    },

    /// Toggle a task done (or back open)
    Done {
        /// Task id
        id: String,
    },
}

/// Output format for commands that print structured data
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use: text, json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}
