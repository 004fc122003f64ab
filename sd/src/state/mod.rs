//! Snapshot persistence and the actor that serializes access to it

mod manager;
mod messages;
mod store;

pub use manager::StateManager;
pub use messages::{StateCommand, StateError, StateResponse};
pub use store::SnapshotStore;
