//! Async facade over the snapshot store
//!
//! All access to the persisted state goes through one actor task that owns
//! the store, so concurrent sync requests, report triggers, and CLI
//! invocations never interleave their read-modify-write cycles.

use super::messages::{StateCommand, StateError, StateResponse};
use super::store::SnapshotStore;
use studycore::command::{self, Command, Event};
use studycore::domain::AppState;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, warn};

/// Handle for interacting with the state actor
#[derive(Clone)]
pub struct StateManager {
    tx: mpsc::Sender<StateCommand>,
}

impl StateManager {
    /// Spawn the state actor and return a handle to it
    pub fn spawn(store: SnapshotStore) -> Self {
        let (tx, rx) = mpsc::channel(256);

        tokio::spawn(actor_loop(store, rx));

        Self { tx }
    }

    /// Read the current snapshot
    pub async fn get(&self) -> StateResponse<Option<AppState>> {
        debug!("StateManager: get called");
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(StateCommand::Get { reply: reply_tx })
            .await
            .map_err(|_| StateError::ChannelError)?;
        reply_rx.await.map_err(|_| StateError::ChannelError)?
    }

    /// Replace the snapshot, answering the one it replaced
    pub async fn replace(&self, state: AppState) -> StateResponse<Option<AppState>> {
        debug!("StateManager: replace called");
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(StateCommand::Replace {
                state: Box::new(state),
                reply: reply_tx,
            })
            .await
            .map_err(|_| StateError::ChannelError)?;
        reply_rx.await.map_err(|_| StateError::ChannelError)?
    }

    /// Apply a domain command, answering the emitted events and the
    /// resulting snapshot
    pub async fn apply(&self, command: Command) -> StateResponse<(Vec<Event>, AppState)> {
        debug!("StateManager: apply called");
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(StateCommand::Apply {
                command,
                reply: reply_tx,
            })
            .await
            .map_err(|_| StateError::ChannelError)?;
        reply_rx.await.map_err(|_| StateError::ChannelError)?
    }

    /// Shutdown the state actor gracefully
    pub async fn shutdown(&self) -> StateResponse<()> {
        debug!("StateManager: shutdown called");
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(StateCommand::Shutdown { reply: reply_tx })
            .await
            .map_err(|_| StateError::ChannelError)?;
        reply_rx.await.map_err(|_| StateError::ChannelError)?
    }
}

/// The actor loop that owns the store
async fn actor_loop(store: SnapshotStore, mut rx: mpsc::Receiver<StateCommand>) {
    info!("State actor started");

    while let Some(cmd) = rx.recv().await {
        match cmd {
            StateCommand::Get { reply } => {
                let result = store.load();
                let _ = reply.send(result);
            }

            StateCommand::Replace { state, reply } => {
                let result = handle_replace(&store, *state);
                let _ = reply.send(result);
            }

            StateCommand::Apply { command, reply } => {
                let result = handle_apply(&store, command);
                let _ = reply.send(result);
            }

            StateCommand::Shutdown { reply } => {
                info!("State actor shutting down");
                let _ = reply.send(Ok(()));
                break;
            }
        }
    }

    debug!("State actor loop ended");
}

/// Replace the snapshot wholesale
///
/// An unreadable previous document does not block the write; it is logged
/// and treated as absent, so the answer carries no previous state to diff
/// against.
fn handle_replace(store: &SnapshotStore, state: AppState) -> StateResponse<Option<AppState>> {
    let previous = match store.load() {
        Ok(previous) => previous,
        Err(e) => {
            warn!("Replacing unreadable snapshot: {}", e);
            None
        }
    };

    store.save(&state)?;
    Ok(previous)
}

/// Run a domain command against the stored snapshot
///
/// Nothing is persisted when the command is rejected.
fn handle_apply(store: &SnapshotStore, cmd: Command) -> StateResponse<(Vec<Event>, AppState)> {
    let mut state = match store.load() {
        Ok(state) => state.unwrap_or_default(),
        Err(e) => {
            warn!("Applying command over unreadable snapshot: {}", e);
            AppState::default()
        }
    };

    let events = match command::apply(&mut state, cmd) {
        Ok(events) => events,
        Err(e) => {
            error!("Command rejected: {}", e);
            return Err(StateError::Rejected(e));
        }
    };

    store.save(&state)?;
    Ok((events, state))
}
