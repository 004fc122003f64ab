//! The synced application state aggregate

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{ExamRecord, Playlist, QuestionRecord, Subject, Task};

/// Everything the client syncs, as one replaceable document
///
/// Every collection defaults to empty so documents written by older client
/// versions (or a partially populated store) still load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppState {
    /// Freestanding planner tasks
    pub tasks: Vec<Task>,

    /// Video playlists
    pub playlists: Vec<Playlist>,

    /// Tracked subjects
    pub subjects: Vec<Subject>,

    /// Topic names per subject id
    pub topics: BTreeMap<String, Vec<String>>,

    /// Question-practice session records
    pub question_records: Vec<QuestionRecord>,

    /// Full practice-exam records
    pub exam_records: Vec<ExamRecord>,
}

impl AppState {
    /// Look up a task by id
    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Look up a task by id, mutably
    pub fn task_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// Look up a playlist by id
    pub fn playlist(&self, id: &str) -> Option<&Playlist> {
        self.playlists.iter().find(|p| p.id == id)
    }

    /// Look up a playlist by id, mutably
    pub fn playlist_mut(&mut self, id: &str) -> Option<&mut Playlist> {
        self.playlists.iter_mut().find(|p| p.id == id)
    }

    /// Look up a subject by id
    pub fn subject(&self, id: &str) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.id == id)
    }

    /// Total video count across playlists
    pub fn video_count(&self) -> usize {
        self.playlists.iter().map(|p| p.videos.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_loads() {
        let state: AppState = serde_json::from_str("{}").unwrap();
        assert!(state.tasks.is_empty());
        assert!(state.playlists.is_empty());
        assert!(state.topics.is_empty());
    }

    #[test]
    fn test_partial_document_loads() {
        // A document from before exam tracking existed
        let json = r#"{
            "tasks": [],
            "playlists": [],
            "subjects": [{"id": "s1", "name": "Matematik", "category": "oabt"}],
            "topics": {"s1": ["Limit", "Türev"]}
        }"#;
        let state: AppState = serde_json::from_str(json).unwrap();
        assert_eq!(state.subjects.len(), 1);
        assert_eq!(state.topics["s1"].len(), 2);
        assert!(state.exam_records.is_empty());
    }

    #[test]
    fn test_wire_key_names() {
        let state = AppState::default();
        let json = serde_json::to_value(&state).unwrap();
        assert!(json.get("questionRecords").is_some());
        assert!(json.get("examRecords").is_some());
        assert!(json.get("question_records").is_none());
    }
}
