//! Command and response types for the state actor

use studycore::command::{Command, CommandError, Event};
use studycore::domain::AppState;
use thiserror::Error;
use tokio::sync::oneshot;

/// Errors that can occur during state operations
#[derive(Debug, Error)]
pub enum StateError {
    #[error("Store operation failed: {0}")]
    Store(String),

    #[error("Stored snapshot is malformed: {0}")]
    Malformed(String),

    #[error("Command rejected: {0}")]
    Rejected(#[from] CommandError),

    #[error("Channel communication error")]
    ChannelError,
}

/// Response type for state operations
pub type StateResponse<T> = Result<T, StateError>;

/// Commands that can be sent to the state actor
#[derive(Debug)]
pub enum StateCommand {
    /// Read the current snapshot, `None` when nothing was stored yet
    Get {
        reply: oneshot::Sender<StateResponse<Option<AppState>>>,
    },

    /// Replace the snapshot wholesale, answering the previous one
    Replace {
        state: Box<AppState>,
        reply: oneshot::Sender<StateResponse<Option<AppState>>>,
    },

    /// Run a domain command against the snapshot and persist the result
    Apply {
        command: Command,
        reply: oneshot::Sender<StateResponse<(Vec<Event>, AppState)>>,
    },

    /// Shutdown the state actor
    Shutdown {
        reply: oneshot::Sender<StateResponse<()>>,
    },
}
