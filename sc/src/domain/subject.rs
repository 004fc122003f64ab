//! Subject domain type

use serde::{Deserialize, Serialize};

use super::id::generate_id;

/// Which exam track a subject belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SubjectCategory {
    #[serde(rename = "ags")]
    Ags,
    #[serde(rename = "oabt")]
    Oabt,
    #[default]
    #[serde(rename = "genel")]
    General,
}

impl std::fmt::Display for SubjectCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ags => write!(f, "ags"),
            Self::Oabt => write!(f, "oabt"),
            Self::General => write!(f, "genel"),
        }
    }
}

/// A tracked study subject
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    /// Unique identifier
    pub id: String,

    /// Subject name (Matematik, Tarih, ...)
    pub name: String,

    /// Exam track
    pub category: SubjectCategory,
}

impl Subject {
    /// Create a new Subject with generated ID
    pub fn new(name: impl Into<String>, category: SubjectCategory) -> Self {
        let name = name.into();
        Self {
            id: generate_id("subject", &name),
            name,
            category,
        }
    }
}
