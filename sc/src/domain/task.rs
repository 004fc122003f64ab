//! Task domain type
//!
//! A Task is a freestanding planner item with its own assigned date, set
//! directly by the user. It never belongs to a playlist.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::id::generate_id;

/// Task kind, serialized as the client's Turkish tags
///
/// Closed set: an unknown tag is a deserialization error, never a silent
/// fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TaskKind {
    /// Watch a video
    #[serde(rename = "video")]
    Video,
    /// Question practice
    #[serde(rename = "soru")]
    Question,
    /// Review session
    #[serde(rename = "tekrar")]
    Review,
    /// Anything else
    #[default]
    #[serde(rename = "diger")]
    Other,
}

impl TaskKind {
    /// Report line icon for this kind
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Video => "📺",
            Self::Question => "✏️",
            Self::Review => "🔄",
            Self::Other => "📌",
        }
    }
}

impl std::fmt::Display for TaskKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Video => write!(f, "video"),
            Self::Question => write!(f, "soru"),
            Self::Review => write!(f, "tekrar"),
            Self::Other => write!(f, "diger"),
        }
    }
}

impl std::str::FromStr for TaskKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "video" => Ok(Self::Video),
            "soru" => Ok(Self::Question),
            "tekrar" => Ok(Self::Review),
            "diger" => Ok(Self::Other),
            other => Err(format!("unknown task kind: '{}'", other)),
        }
    }
}

/// A freestanding planner task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier (opaque; client ids and generated ids coexist)
    pub id: String,

    /// Human-readable title
    pub title: String,

    /// Kind tag, drives the report icon
    #[serde(rename = "type", default)]
    pub kind: TaskKind,

    /// Completion flag
    #[serde(default)]
    pub completed: bool,

    /// Assigned calendar date
    pub date: NaiveDate,

    /// Estimated duration in minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,

    /// Subject name (Matematik, Tarih, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    /// Topic name within the subject
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
}

impl Task {
    /// Create a new Task with generated ID
    pub fn new(title: impl Into<String>, kind: TaskKind, date: NaiveDate) -> Self {
        let title = title.into();
        Self {
            id: generate_id("task", &title),
            title,
            kind,
            completed: false,
            date,
            duration: None,
            subject: None,
            topic: None,
        }
    }

    /// Create a Task with a specific ID (for tests and fixtures)
    pub fn with_id(id: impl Into<String>, title: impl Into<String>, kind: TaskKind, date: NaiveDate) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            kind,
            completed: false,
            date,
            duration: None,
            subject: None,
            topic: None,
        }
    }

    /// Attach a subject name
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Past its date and still not completed
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.completed && self.date < today
    }

    /// Assigned to the given date
    pub fn is_due_on(&self, today: NaiveDate) -> bool {
        self.date == today
    }
}
