//! StudyCore - Study plan scheduling and analysis
//!
//! StudyCore is the pure core of the study tracker: it models the synced
//! application state (tasks, video playlists, subjects, exam records),
//! distributes playlist videos across eligible weekdays, classifies items
//! against a calendar date, and renders the Telegram report texts.
//!
//! # Core Concepts
//!
//! - **Pure and Synchronous**: no I/O, no clock reads, no ambient
//!   randomness. Callers pass in `today` and an RNG; identical inputs give
//!   identical outputs.
//! - **Snapshot In, Result Out**: every operation takes an [`AppState`]
//!   snapshot (or two, for diffing) and returns a new value. Mutation goes
//!   through the [`command`] pipeline, which returns explicit events.
//! - **Wire Fidelity**: the serde model round-trips documents written by the
//!   existing web client (camelCase keys, Turkish kind tags).
//!
//! # Modules
//!
//! - [`domain`] - Data model: tasks, videos, playlists, subjects, records
//! - [`scheduler`] - Video distribution across eligible weekdays
//! - [`analyzer`] - Overdue / due-today / done-today classification
//! - [`report`] - MarkdownV2 report builders and the escaping rule
//! - [`diff`] - Snapshot diffing for sync notifications
//! - [`command`] - State mutations as commands emitting events

pub mod analyzer;
pub mod command;
pub mod diff;
pub mod domain;
pub mod report;
pub mod scheduler;

// Re-export commonly used types
pub use analyzer::{Analysis, ItemOrigin, PlannedItem, analyze};
pub use command::{Command, CommandError, Event, PlaylistDraft, VideoDraft, apply};
pub use diff::{StateDiff, diff};
pub use domain::{
    AppState, DayOfWeek, ExamKind, ExamRecord, Playlist, QuestionRecord, Subject, SubjectCategory, SubjectResult,
    Task, TaskKind, Video, VideoKind,
};
pub use scheduler::{DailyPlan, Distribution, ScheduleError, daily_plan, distribute, schedule_playlist};
