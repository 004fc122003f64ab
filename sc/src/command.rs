//! State mutation commands
//!
//! Every write against [`AppState`] goes through [`apply`]: a closed
//! [`Command`] enum, validated up front, applied atomically, answering
//! with the [`Event`]s a driver may want to announce. Nothing here reads
//! the clock or performs I/O; callers supply timestamps and persist the
//! mutated snapshot themselves.

use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;
use tracing::debug;

use crate::domain::{
    AppState, DayOfWeek, ExamRecord, Playlist, QuestionRecord, Subject, SubjectCategory, Task,
    TaskKind, Video, VideoKind, generate_id,
};
use crate::scheduler::{ScheduleError, schedule_playlist};

/// Rejections raised before any part of a command is applied
#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    #[error("unknown task id: {0}")]
    UnknownTask(String),

    #[error("unknown playlist id: {0}")]
    UnknownPlaylist(String),

    #[error("unknown video id {video} in playlist {playlist}")]
    UnknownVideo { playlist: String, video: String },

    #[error("unknown subject id: {0}")]
    UnknownSubject(String),

    #[error("unknown topic {topic:?} for subject {subject}")]
    UnknownTopic { subject: String, topic: String },

    #[error("topic {topic:?} already recorded for subject {subject}")]
    DuplicateTopic { subject: String, topic: String },

    #[error("unknown question record id: {0}")]
    UnknownQuestionRecord(String),

    #[error("unknown exam record id: {0}")]
    UnknownExamRecord(String),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),
}

/// A video to be created inside a playlist draft
#[derive(Debug, Clone)]
pub struct VideoDraft {
    pub title: String,
    pub duration: u32,
    pub url: Option<String>,
    pub thumbnail: Option<String>,
    pub kind: VideoKind,
    pub topic: Option<String>,
}

/// Everything needed to create and schedule a playlist in one step
#[derive(Debug, Clone)]
pub struct PlaylistDraft {
    pub name: String,
    pub subject: Option<String>,
    pub subject_id: Option<String>,
    pub videos: Vec<VideoDraft>,
    pub selected_days: Vec<DayOfWeek>,
    pub start_date: NaiveDate,
    pub videos_per_day: u32,
}

/// The closed mutation surface over [`AppState`]
#[derive(Debug, Clone)]
pub enum Command {
    AddTask {
        title: String,
        kind: TaskKind,
        date: NaiveDate,
        subject: Option<String>,
        topic: Option<String>,
        duration: Option<u32>,
    },
    ToggleTask {
        id: String,
    },
    DeleteTask {
        id: String,
    },
    /// Creates the playlist, generates video ids and runs the distribution
    /// before anything lands in the state
    AddPlaylist {
        draft: PlaylistDraft,
        created_at: DateTime<Utc>,
    },
    DeletePlaylist {
        id: String,
    },
    ToggleVideoWatched {
        playlist_id: String,
        video_id: String,
    },
    AddSubject {
        name: String,
        category: SubjectCategory,
    },
    /// Removes the subject and its topic list
    DeleteSubject {
        id: String,
    },
    AddTopic {
        subject_id: String,
        topic: String,
    },
    DeleteTopic {
        subject_id: String,
        topic: String,
    },
    /// The record's id is replaced with a generated one
    AddQuestionRecord {
        record: QuestionRecord,
    },
    DeleteQuestionRecord {
        id: String,
    },
    /// The record's id is replaced with a generated one
    AddExamRecord {
        record: ExamRecord,
    },
    DeleteExamRecord {
        id: String,
    },
}

/// What a successfully applied command did, for drivers to announce
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    TaskAdded { id: String, title: String },
    TaskCompleted { id: String, title: String },
    TaskReopened { id: String, title: String },
    TaskDeleted { id: String },
    PlaylistAdded { id: String, name: String, video_count: usize, end_date: Option<NaiveDate> },
    PlaylistDeleted { id: String },
    VideoWatched { playlist_id: String, video_id: String, title: String },
    VideoUnwatched { playlist_id: String, video_id: String, title: String },
    SubjectAdded { id: String, name: String },
    SubjectDeleted { id: String },
    TopicAdded { subject_id: String, topic: String },
    TopicDeleted { subject_id: String, topic: String },
    QuestionRecordAdded { id: String },
    QuestionRecordDeleted { id: String },
    ExamRecordAdded { id: String },
    ExamRecordDeleted { id: String },
}

/// Apply one command to the state
///
/// Validation happens before the first mutation; on error the state is
/// untouched.
pub fn apply(state: &mut AppState, command: Command) -> Result<Vec<Event>, CommandError> {
    debug!(?command, "apply: called");

    match command {
        Command::AddTask { title, kind, date, subject, topic, duration } => {
            let mut task = Task::new(title, kind, date);
            task.subject = subject;
            task.topic = topic;
            task.duration = duration;
            let event = Event::TaskAdded { id: task.id.clone(), title: task.title.clone() };
            state.tasks.push(task);
            Ok(vec![event])
        }

        Command::ToggleTask { id } => {
            let task = state.task_mut(&id).ok_or_else(|| CommandError::UnknownTask(id.clone()))?;
            task.completed = !task.completed;
            let event = if task.completed {
                Event::TaskCompleted { id: task.id.clone(), title: task.title.clone() }
            } else {
                Event::TaskReopened { id: task.id.clone(), title: task.title.clone() }
            };
            Ok(vec![event])
        }

        Command::DeleteTask { id } => {
            if state.task(&id).is_none() {
                return Err(CommandError::UnknownTask(id));
            }
            state.tasks.retain(|t| t.id != id);
            Ok(vec![Event::TaskDeleted { id }])
        }

        Command::AddPlaylist { draft, created_at } => {
            let mut playlist = Playlist::new(draft.name, created_at);
            playlist.subject = draft.subject;
            playlist.subject_id = draft.subject_id;
            playlist.selected_days = draft.selected_days;
            let owner_id = playlist.id.clone();
            let subject = playlist.subject.clone();
            playlist.videos = draft
                .videos
                .into_iter()
                .map(|v| Video {
                    id: generate_id("video", &v.title),
                    title: v.title,
                    duration: v.duration,
                    watched: false,
                    url: v.url,
                    thumbnail: v.thumbnail,
                    kind: v.kind,
                    subject: subject.clone(),
                    topic: v.topic,
                    assigned_date: None,
                    playlist_id: Some(owner_id.clone()),
                })
                .collect();

            schedule_playlist(&mut playlist, draft.start_date, draft.videos_per_day)?;

            let event = Event::PlaylistAdded {
                id: playlist.id.clone(),
                name: playlist.name.clone(),
                video_count: playlist.videos.len(),
                end_date: playlist.end_date,
            };
            state.playlists.push(playlist);
            Ok(vec![event])
        }

        Command::DeletePlaylist { id } => {
            if state.playlist(&id).is_none() {
                return Err(CommandError::UnknownPlaylist(id));
            }
            state.playlists.retain(|p| p.id != id);
            Ok(vec![Event::PlaylistDeleted { id }])
        }

        Command::ToggleVideoWatched { playlist_id, video_id } => {
            let playlist = state
                .playlist_mut(&playlist_id)
                .ok_or_else(|| CommandError::UnknownPlaylist(playlist_id.clone()))?;
            let video = playlist.video_mut(&video_id).ok_or_else(|| CommandError::UnknownVideo {
                playlist: playlist_id.clone(),
                video: video_id.clone(),
            })?;
            video.watched = !video.watched;
            let event = if video.watched {
                Event::VideoWatched { playlist_id, video_id, title: video.title.clone() }
            } else {
                Event::VideoUnwatched { playlist_id, video_id, title: video.title.clone() }
            };
            Ok(vec![event])
        }

        Command::AddSubject { name, category } => {
            let subject = Subject::new(name, category);
            let event = Event::SubjectAdded { id: subject.id.clone(), name: subject.name.clone() };
            state.subjects.push(subject);
            Ok(vec![event])
        }

        Command::DeleteSubject { id } => {
            if state.subject(&id).is_none() {
                return Err(CommandError::UnknownSubject(id));
            }
            state.subjects.retain(|s| s.id != id);
            state.topics.remove(&id);
            Ok(vec![Event::SubjectDeleted { id }])
        }

        Command::AddTopic { subject_id, topic } => {
            if state.subject(&subject_id).is_none() {
                return Err(CommandError::UnknownSubject(subject_id));
            }
            let topics = state.topics.entry(subject_id.clone()).or_default();
            if topics.contains(&topic) {
                return Err(CommandError::DuplicateTopic { subject: subject_id, topic });
            }
            topics.push(topic.clone());
            Ok(vec![Event::TopicAdded { subject_id, topic }])
        }

        Command::DeleteTopic { subject_id, topic } => {
            if state.subject(&subject_id).is_none() {
                return Err(CommandError::UnknownSubject(subject_id));
            }
            let known = state.topics.get(&subject_id).is_some_and(|t| t.contains(&topic));
            if !known {
                return Err(CommandError::UnknownTopic { subject: subject_id, topic });
            }
            if let Some(topics) = state.topics.get_mut(&subject_id) {
                topics.retain(|t| t != &topic);
            }
            Ok(vec![Event::TopicDeleted { subject_id, topic }])
        }

        Command::AddQuestionRecord { mut record } => {
            record.id = generate_id("question", &record.subject_label);
            let event = Event::QuestionRecordAdded { id: record.id.clone() };
            state.question_records.push(record);
            Ok(vec![event])
        }

        Command::DeleteQuestionRecord { id } => {
            if !state.question_records.iter().any(|r| r.id == id) {
                return Err(CommandError::UnknownQuestionRecord(id));
            }
            state.question_records.retain(|r| r.id != id);
            Ok(vec![Event::QuestionRecordDeleted { id }])
        }

        Command::AddExamRecord { mut record } => {
            record.id = generate_id("exam", &record.exam_name);
            let event = Event::ExamRecordAdded { id: record.id.clone() };
            state.exam_records.push(record);
            Ok(vec![event])
        }

        Command::DeleteExamRecord { id } => {
            if !state.exam_records.iter().any(|r| r.id == id) {
                return Err(CommandError::UnknownExamRecord(id));
            }
            state.exam_records.retain(|r| r.id != id);
            Ok(vec![Event::ExamRecordDeleted { id }])
        }
    }
}
