//! Snapshot comparison for the sync path
//!
//! Compares the previously stored [`AppState`] with a freshly pushed one
//! and reports what changed in terms worth notifying about: new tasks,
//! new playlists, tasks flipped to completed, videos flipped to watched.
//! Tasks and videos live in separate id namespaces and are never compared
//! against each other.

use std::collections::HashSet;

use tracing::debug;

use crate::domain::{AppState, Playlist, Task, Video};

/// Changes between two snapshots, in snapshot order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateDiff {
    /// Tasks present in the new snapshot but not the old one
    pub added_tasks: Vec<Task>,
    /// Playlists present in the new snapshot but not the old one
    pub added_playlists: Vec<Playlist>,
    /// Tasks that were not completed before (or did not exist) and are now
    pub completed_tasks: Vec<Task>,
    /// Videos that were not watched before (or did not exist) and are now
    pub watched_videos: Vec<Video>,
}

impl StateDiff {
    /// Nothing notification-worthy changed
    pub fn is_empty(&self) -> bool {
        self.added_tasks.is_empty()
            && self.added_playlists.is_empty()
            && self.completed_tasks.is_empty()
            && self.watched_videos.is_empty()
    }

    /// Completions across both namespaces
    pub fn completion_count(&self) -> usize {
        self.completed_tasks.len() + self.watched_videos.len()
    }
}

/// Compare `old` and `new`, collecting additions and fresh completions
pub fn diff(old: &AppState, new: &AppState) -> StateDiff {
    let old_task_ids: HashSet<&str> = old.tasks.iter().map(|t| t.id.as_str()).collect();
    let old_playlist_ids: HashSet<&str> = old.playlists.iter().map(|p| p.id.as_str()).collect();
    let completed_before: HashSet<&str> = old
        .tasks
        .iter()
        .filter(|t| t.completed)
        .map(|t| t.id.as_str())
        .collect();
    let watched_before: HashSet<&str> = old
        .playlists
        .iter()
        .flat_map(|p| p.videos.iter())
        .filter(|v| v.watched)
        .map(|v| v.id.as_str())
        .collect();

    let mut out = StateDiff::default();

    for task in &new.tasks {
        if !old_task_ids.contains(task.id.as_str()) {
            out.added_tasks.push(task.clone());
        }
        if task.completed && !completed_before.contains(task.id.as_str()) {
            out.completed_tasks.push(task.clone());
        }
    }

    for playlist in &new.playlists {
        if !old_playlist_ids.contains(playlist.id.as_str()) {
            out.added_playlists.push(playlist.clone());
        }
    }

    // watched videos are keyed by video id, regardless of which playlist
    // carries them in either snapshot
    let mut seen: HashSet<&str> = HashSet::new();
    for video in new.playlists.iter().flat_map(|p| p.videos.iter()) {
        if video.watched && !watched_before.contains(video.id.as_str()) && seen.insert(video.id.as_str()) {
            out.watched_videos.push(video.clone());
        }
    }

    debug!(
        added_tasks = out.added_tasks.len(),
        added_playlists = out.added_playlists.len(),
        completed_tasks = out.completed_tasks.len(),
        watched_videos = out.watched_videos.len(),
        "diff: computed"
    );

    out
}
