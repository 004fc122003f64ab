//! StudyDaemon - AGS study tracker daemon
//!
//! StudyDaemon keeps a student honest. It mirrors the study app's state
//! through a small HTTP sync API, persists it as a single JSON snapshot,
//! and sends sharply worded Telegram reports three times a day: the
//! morning program, a midday nudge while tasks are still open, and the
//! evening reckoning.
//!
//! # Modules
//!
//! - [`state`] - Snapshot store and the actor that serializes access
//! - [`notify`] - Notifier trait and the Telegram implementation
//! - [`reporter`] - Report slots wired to the analyzer and builders
//! - [`trigger`] - Wall-clock trigger that fires the daily slots
//! - [`server`] - HTTP sync boundary for the study app
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod cli;
pub mod config;
pub mod notify;
pub mod reporter;
pub mod server;
pub mod state;
pub mod trigger;

// Re-export commonly used types
pub use config::Config;
pub use notify::{Notifier, NotifyError, TelegramNotifier};
pub use reporter::{Reporter, ReportSlot, SlotOutcome};
pub use server::AppCtx;
pub use state::{SnapshotStore, StateCommand, StateError, StateManager, StateResponse};
pub use trigger::ReportTrigger;
