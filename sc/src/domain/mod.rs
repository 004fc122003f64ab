//! Domain types for the study tracker
//!
//! Everything here serializes to the same JSON the web client reads and
//! writes: camelCase field names, lowercase weekday labels, Turkish kind
//! tags. Collections tolerate absent fields so older documents load.

mod day;
mod exam;
mod id;
mod state;
mod subject;
mod task;
mod video;

pub use day::DayOfWeek;
pub use exam::{ExamKind, ExamRecord, ExamSection, QuestionRecord, SubjectResult, net_score};
pub use id::generate_id;
pub use state::AppState;
pub use subject::{Subject, SubjectCategory};
pub use task::{Task, TaskKind};
pub use video::{Playlist, Video, VideoKind};
