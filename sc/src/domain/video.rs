//! Video and Playlist domain types
//!
//! A Playlist exclusively owns its videos. Once created by the scheduler its
//! structure is fixed: only the per-video `watched` flag changes, or the
//! playlist is deleted whole.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::DayOfWeek;
use super::id::generate_id;

/// Video kind, serialized as the client's Turkish tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum VideoKind {
    /// Lecture / topic walkthrough
    #[default]
    #[serde(rename = "konu")]
    Lecture,
    /// Question solving session
    #[serde(rename = "soru")]
    Question,
    /// General review
    #[serde(rename = "tekrar")]
    Review,
}

impl VideoKind {
    /// Display label as the client shows it
    pub fn label(&self) -> &'static str {
        match self {
            Self::Lecture => "Konu Anlatımı",
            Self::Question => "Soru Çözümü",
            Self::Review => "Genel Tekrar",
        }
    }

    /// Icon as the client shows it
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Lecture => "📚",
            Self::Question => "✏️",
            Self::Review => "🔄",
        }
    }
}

impl std::fmt::Display for VideoKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lecture => write!(f, "konu"),
            Self::Question => write!(f, "soru"),
            Self::Review => write!(f, "tekrar"),
        }
    }
}

/// A single playlist video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    /// Unique identifier within the video id namespace
    pub id: String,

    /// Video title
    pub title: String,

    /// Duration in minutes
    pub duration: u32,

    /// Watched flag (the video's completion state)
    #[serde(default)]
    pub watched: bool,

    /// Source link
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Thumbnail link
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,

    /// Kind tag
    #[serde(rename = "videoType", default)]
    pub kind: VideoKind,

    /// Subject name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    /// Topic name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,

    /// Calendar date the scheduler assigned, if scheduled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_date: Option<NaiveDate>,

    /// Owning playlist id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playlist_id: Option<String>,
}

impl Video {
    /// Past its assigned date and still unwatched
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        match self.assigned_date {
            Some(date) => !self.watched && date < today,
            None => false,
        }
    }

    /// Assigned to the given date
    pub fn is_due_on(&self, today: NaiveDate) -> bool {
        self.assigned_date == Some(today)
    }
}

/// An ordered video playlist with its distribution settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    /// Unique identifier
    pub id: String,

    /// Playlist name
    pub name: String,

    /// Subject name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    /// Subject id, when linked to a tracked subject
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<String>,

    /// Videos in watch order
    #[serde(default)]
    pub videos: Vec<Video>,

    /// Weekdays this playlist is active on
    #[serde(default)]
    pub selected_days: Vec<DayOfWeek>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// First eligible distribution date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,

    /// Per-day video capacity used at distribution time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub videos_per_day: Option<u32>,

    /// Date of the last assigned video
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

impl Playlist {
    /// Create an empty playlist shell with generated ID
    pub fn new(name: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        let name = name.into();
        Self {
            id: generate_id("playlist", &name),
            name,
            subject: None,
            subject_id: None,
            videos: Vec::new(),
            selected_days: Vec::new(),
            created_at,
            start_date: None,
            videos_per_day: None,
            end_date: None,
        }
    }

    /// Create an empty playlist shell with the given ID
    pub fn with_id(id: impl Into<String>, name: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            subject: None,
            subject_id: None,
            videos: Vec::new(),
            selected_days: Vec::new(),
            created_at,
            start_date: None,
            videos_per_day: None,
            end_date: None,
        }
    }

    /// Count of watched videos
    pub fn watched_count(&self) -> usize {
        self.videos.iter().filter(|v| v.watched).count()
    }

    /// Look up a video by id
    pub fn video(&self, video_id: &str) -> Option<&Video> {
        self.videos.iter().find(|v| v.id == video_id)
    }

    /// Look up a video by id, mutably
    pub fn video_mut(&mut self, video_id: &str) -> Option<&mut Video> {
        self.videos.iter_mut().find(|v| v.id == video_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_video_overdue_requires_assigned_date() {
        let mut video = Video {
            id: "v1".into(),
            title: "Türev".into(),
            duration: 20,
            watched: false,
            url: None,
            thumbnail: None,
            kind: VideoKind::Lecture,
            subject: None,
            topic: None,
            assigned_date: None,
            playlist_id: None,
        };
        // unscheduled videos are never overdue or due
        assert!(!video.is_overdue(date(2024, 6, 10)));
        assert!(!video.is_due_on(date(2024, 6, 10)));

        video.assigned_date = Some(date(2024, 6, 9));
        assert!(video.is_overdue(date(2024, 6, 10)));

        video.watched = true;
        assert!(!video.is_overdue(date(2024, 6, 10)));
    }

    #[test]
    fn test_playlist_wire_round_trip() {
        let json = r#"{
            "id": "playlist-1717405200000",
            "name": "Analiz Kampı",
            "subject": "Matematik",
            "videos": [
                {
                    "id": "video-1717405200000-0",
                    "title": "Limit 1",
                    "duration": 25,
                    "watched": true,
                    "videoType": "konu",
                    "assignedDate": "2024-06-03",
                    "playlistId": "playlist-1717405200000"
                }
            ],
            "selectedDays": ["monday", "wednesday"],
            "createdAt": "2024-06-01T09:30:00.000Z",
            "startDate": "2024-06-03",
            "videosPerDay": 2,
            "endDate": "2024-06-03"
        }"#;
        let playlist: Playlist = serde_json::from_str(json).unwrap();
        assert_eq!(playlist.videos.len(), 1);
        assert_eq!(playlist.selected_days, vec![DayOfWeek::Monday, DayOfWeek::Wednesday]);
        assert_eq!(playlist.videos[0].kind, VideoKind::Lecture);
        assert_eq!(playlist.videos[0].assigned_date, Some(date(2024, 6, 3)));
        assert_eq!(playlist.watched_count(), 1);

        let back = serde_json::to_value(&playlist).unwrap();
        assert_eq!(back["selectedDays"][0], "monday");
        assert_eq!(back["videos"][0]["videoType"], "konu");
        assert_eq!(back["videos"][0]["assignedDate"], "2024-06-03");
        assert_eq!(back["videosPerDay"], 2);
    }

    #[test]
    fn test_video_lookup() {
        let mut playlist = Playlist::new("Deneme", Utc::now());
        playlist.videos.push(Video {
            id: "v1".into(),
            title: "a".into(),
            duration: 10,
            watched: false,
            url: None,
            thumbnail: None,
            kind: VideoKind::Lecture,
            subject: None,
            topic: None,
            assigned_date: None,
            playlist_id: Some(playlist.id.clone()),
        });
        assert!(playlist.video("v1").is_some());
        assert!(playlist.video("v2").is_none());

        playlist.video_mut("v1").unwrap().watched = true;
        assert_eq!(playlist.watched_count(), 1);
    }
}
