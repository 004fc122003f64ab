//! Day classification over a state snapshot
//!
//! Flattens tasks and playlist videos into one item list and buckets them
//! against a given date: overdue (past date, not done), due today (dated
//! today, done or not), and done today (the completed subset of due today).
//! Items without an assigned date stay out of every bucket.

use chrono::NaiveDate;
use tracing::debug;

use crate::domain::{AppState, TaskKind};

/// Where an analyzed item came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOrigin {
    /// Freestanding planner task
    Task,
    /// Video owned by the named playlist
    PlaylistVideo { playlist: String },
}

/// A task or playlist video, flattened for classification
///
/// Task ids and video ids are separate namespaces; `origin` keeps them
/// apart.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedItem {
    pub id: String,
    pub title: String,
    /// Report icon kind; every playlist video maps to [`TaskKind::Video`]
    pub kind: TaskKind,
    pub date: NaiveDate,
    pub completed: bool,
    pub subject: Option<String>,
    pub origin: ItemOrigin,
}

impl PlannedItem {
    /// True for freestanding tasks
    pub fn is_task(&self) -> bool {
        self.origin == ItemOrigin::Task
    }
}

/// Bucketed view of one day
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Analysis {
    /// Dated before today and not completed
    pub overdue: Vec<PlannedItem>,
    /// Dated today, completed or not
    pub due_today: Vec<PlannedItem>,
    /// The completed subset of `due_today`
    pub done_today: Vec<PlannedItem>,
    /// No overdue items and nothing incomplete today
    pub all_clear: bool,
}

impl Analysis {
    /// Today's still-incomplete items
    pub fn pending_today(&self) -> Vec<&PlannedItem> {
        self.due_today.iter().filter(|i| !i.completed).collect()
    }

    /// Count driving the midday nudge
    pub fn pending_count(&self) -> usize {
        self.due_today.iter().filter(|i| !i.completed).count()
    }

    /// True when nothing at all is planned for today
    pub fn is_empty_day(&self) -> bool {
        self.due_today.is_empty()
    }
}

/// Classify every task and playlist video against `today`
///
/// Order inside each bucket: tasks first (snapshot order), then playlist
/// videos (playlist order, videos in watch order) - the order the reports
/// list them in.
pub fn analyze(state: &AppState, today: NaiveDate) -> Analysis {
    debug!(
        tasks = state.tasks.len(),
        playlists = state.playlists.len(),
        %today,
        "analyze: called"
    );

    let mut analysis = Analysis::default();

    for task in &state.tasks {
        let item = PlannedItem {
            id: task.id.clone(),
            title: task.title.clone(),
            kind: task.kind,
            date: task.date,
            completed: task.completed,
            subject: task.subject.clone(),
            origin: ItemOrigin::Task,
        };
        if task.is_overdue(today) {
            analysis.overdue.push(item);
        } else if task.is_due_on(today) {
            analysis.due_today.push(item.clone());
            if item.completed {
                analysis.done_today.push(item);
            }
        }
    }

    for playlist in &state.playlists {
        for video in &playlist.videos {
            let Some(date) = video.assigned_date else {
                continue;
            };
            let item = PlannedItem {
                id: video.id.clone(),
                title: video.title.clone(),
                kind: TaskKind::Video,
                date,
                completed: video.watched,
                subject: video.subject.clone(),
                origin: ItemOrigin::PlaylistVideo {
                    playlist: playlist.name.clone(),
                },
            };
            if video.is_overdue(today) {
                analysis.overdue.push(item);
            } else if video.is_due_on(today) {
                analysis.due_today.push(item.clone());
                if item.completed {
                    analysis.done_today.push(item);
                }
            }
        }
    }

    analysis.all_clear = analysis.overdue.is_empty() && analysis.due_today.iter().all(|i| i.completed);

    debug!(
        overdue = analysis.overdue.len(),
        due_today = analysis.due_today.len(),
        done_today = analysis.done_today.len(),
        all_clear = analysis.all_clear,
        "analyze: done"
    );
    analysis
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DayOfWeek, Playlist, Task, Video, VideoKind};
    use chrono::Utc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn video(id: &str, assigned: Option<NaiveDate>, watched: bool) -> Video {
        Video {
            id: id.into(),
            title: format!("Video {}", id),
            duration: 20,
            watched,
            url: None,
            thumbnail: None,
            kind: VideoKind::Lecture,
            subject: None,
            topic: None,
            assigned_date: assigned,
            playlist_id: None,
        }
    }

    fn state_with_playlist(videos: Vec<Video>) -> AppState {
        let mut playlist = Playlist::new("Analiz Kampı", Utc::now());
        playlist.selected_days = vec![DayOfWeek::Monday];
        playlist.videos = videos;
        AppState {
            playlists: vec![playlist],
            ..Default::default()
        }
    }

    // === CLASSIFICATION ===

    #[test]
    fn test_incomplete_past_task_is_overdue() {
        let today = date(2024, 6, 10);
        let mut state = AppState::default();
        state.tasks.push(Task::with_id("t1", "Dünkü görev", TaskKind::Other, date(2024, 6, 9)));

        let analysis = analyze(&state, today);
        assert_eq!(analysis.overdue.len(), 1);
        assert_eq!(analysis.overdue[0].id, "t1");
        assert!(!analysis.all_clear);

        // completed: drops out of overdue entirely
        state.tasks[0].completed = true;
        let analysis = analyze(&state, today);
        assert!(analysis.overdue.is_empty());
        assert!(analysis.all_clear);
    }

    #[test]
    fn test_due_today_keeps_completed_items() {
        let today = date(2024, 6, 10);
        let mut state = AppState::default();
        let mut done = Task::with_id("t1", "Biten", TaskKind::Question, today);
        done.completed = true;
        state.tasks.push(done);
        state.tasks.push(Task::with_id("t2", "Bekleyen", TaskKind::Review, today));

        let analysis = analyze(&state, today);
        assert_eq!(analysis.due_today.len(), 2);
        assert_eq!(analysis.done_today.len(), 1);
        assert_eq!(analysis.done_today[0].id, "t1");
        assert_eq!(analysis.pending_count(), 1);
        assert!(!analysis.all_clear);
    }

    #[test]
    fn test_unscheduled_videos_excluded() {
        let today = date(2024, 6, 10);
        let state = state_with_playlist(vec![video("v1", None, false)]);

        let analysis = analyze(&state, today);
        assert!(analysis.overdue.is_empty());
        assert!(analysis.due_today.is_empty());
        assert!(analysis.all_clear);
    }

    #[test]
    fn test_watched_today_video_lands_in_done_today() {
        let today = date(2024, 6, 10);
        let state = state_with_playlist(vec![
            video("v1", Some(today), true),
            video("v2", Some(today), false),
            video("v3", Some(date(2024, 6, 5)), false),
        ]);

        let analysis = analyze(&state, today);
        assert_eq!(analysis.due_today.len(), 2);
        assert_eq!(analysis.done_today.len(), 1);
        assert_eq!(analysis.overdue.len(), 1);
        assert_eq!(analysis.overdue[0].id, "v3");
        assert_eq!(analysis.due_today[0].kind, TaskKind::Video);
        assert_eq!(
            analysis.due_today[0].origin,
            ItemOrigin::PlaylistVideo {
                playlist: "Analiz Kampı".into()
            }
        );
    }

    #[test]
    fn test_tasks_listed_before_videos() {
        let today = date(2024, 6, 10);
        let mut state = state_with_playlist(vec![video("v1", Some(today), false)]);
        state.tasks.push(Task::with_id("t1", "Görev", TaskKind::Other, today));

        let analysis = analyze(&state, today);
        assert!(analysis.due_today[0].is_task());
        assert!(!analysis.due_today[1].is_task());
    }

    // === ALL CLEAR ===

    #[test]
    fn test_all_clear_on_empty_state() {
        let analysis = analyze(&AppState::default(), date(2024, 6, 10));
        assert!(analysis.all_clear);
        assert!(analysis.is_empty_day());
    }

    #[test]
    fn test_all_clear_both_directions() {
        let today = date(2024, 6, 10);

        // everything today completed -> clear
        let mut state = AppState::default();
        let mut task = Task::with_id("t1", "Biten", TaskKind::Other, today);
        task.completed = true;
        state.tasks.push(task);
        assert!(analyze(&state, today).all_clear);

        // one incomplete today item -> not clear
        state.tasks.push(Task::with_id("t2", "Kalan", TaskKind::Other, today));
        assert!(!analyze(&state, today).all_clear);

        // one overdue item -> not clear, even with today done
        let mut state = AppState::default();
        let mut task = Task::with_id("t1", "Biten", TaskKind::Other, today);
        task.completed = true;
        state.tasks.push(task);
        state.tasks.push(Task::with_id("t3", "Eski", TaskKind::Other, date(2024, 6, 1)));
        assert!(!analyze(&state, today).all_clear);
    }

    #[test]
    fn test_analyze_is_idempotent() {
        let today = date(2024, 6, 10);
        let mut state = state_with_playlist(vec![video("v1", Some(today), false)]);
        state.tasks.push(Task::with_id("t1", "Görev", TaskKind::Other, date(2024, 6, 2)));

        let first = analyze(&state, today);
        let second = analyze(&state, today);
        assert_eq!(first, second);
    }
}
