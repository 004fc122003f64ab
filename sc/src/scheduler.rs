//! Video distribution across eligible weekdays
//!
//! Given an ordered item list, a start date, the weekdays a playlist is
//! active on, and a per-day capacity, assign each item a calendar date:
//! fill the first eligible day up to capacity, then hop to the next
//! eligible day (always at least one calendar day forward), and so on.
//! Input order is preserved; assigned dates never decrease.

use chrono::NaiveDate;
use thiserror::Error;
use tracing::debug;

use crate::domain::{DayOfWeek, Playlist, Video};

/// Errors that reject a distribution request before any assignment
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("nothing to distribute: item list is empty")]
    NoItems,

    #[error("no eligible weekdays selected")]
    NoEligibleDays,

    #[error("per-day capacity must be at least 1")]
    ZeroCapacity,

    #[error("distribution walked past the supported calendar range")]
    OutOfRange,
}

/// Result of a distribution: one date per input item, in input order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Distribution {
    /// Assigned dates, parallel to the input item order
    pub dates: Vec<NaiveDate>,
    /// Date of the last item
    pub end_date: NaiveDate,
}

/// One calendar day of an already-scheduled playlist
#[derive(Debug, Clone, PartialEq)]
pub struct DailyPlan {
    pub date: NaiveDate,
    pub day_of_week: DayOfWeek,
    pub videos: Vec<Video>,
}

/// Assign dates to `item_count` ordered items
///
/// Deterministic: no randomness, no clock reads. Fails up front on empty
/// input, an empty weekday set, or zero capacity; never partially assigns.
pub fn distribute(
    item_count: usize,
    start: NaiveDate,
    eligible: &[DayOfWeek],
    per_day: u32,
) -> Result<Distribution, ScheduleError> {
    debug!(item_count, %start, ?eligible, per_day, "distribute: called");

    if item_count == 0 {
        return Err(ScheduleError::NoItems);
    }
    if eligible.is_empty() {
        return Err(ScheduleError::NoEligibleDays);
    }
    if per_day == 0 {
        return Err(ScheduleError::ZeroCapacity);
    }

    // Cursor starts on the first eligible day, which may be the start date
    // itself.
    let mut cursor = first_eligible(start, eligible)?;
    let mut dates = Vec::with_capacity(item_count);
    let mut placed_today: u32 = 0;

    for placed in 0..item_count {
        dates.push(cursor);
        placed_today += 1;

        // Advance only while items remain, and always by at least one day.
        if placed_today >= per_day && placed + 1 < item_count {
            cursor = next_eligible(cursor, eligible)?;
            placed_today = 0;
        }
    }

    let end_date = *dates.last().ok_or(ScheduleError::NoItems)?;
    debug!(%end_date, "distribute: done");
    Ok(Distribution { dates, end_date })
}

/// Distribute a playlist's videos in place
///
/// Stamps each video's assigned date and records the distribution settings
/// (`start_date`, `videos_per_day`, derived `end_date`) on the playlist.
pub fn schedule_playlist(playlist: &mut Playlist, start: NaiveDate, per_day: u32) -> Result<(), ScheduleError> {
    debug!(playlist_id = %playlist.id, %start, per_day, "schedule_playlist: called");

    let distribution = distribute(playlist.videos.len(), start, &playlist.selected_days, per_day)?;
    for (video, date) in playlist.videos.iter_mut().zip(&distribution.dates) {
        video.assigned_date = Some(*date);
    }
    playlist.start_date = Some(start);
    playlist.videos_per_day = Some(per_day);
    playlist.end_date = Some(distribution.end_date);
    Ok(())
}

/// Group a playlist's scheduled videos by assigned date, in date order
///
/// Videos without an assigned date are left out.
pub fn daily_plan(playlist: &Playlist) -> Vec<DailyPlan> {
    let mut by_date: std::collections::BTreeMap<NaiveDate, Vec<Video>> = std::collections::BTreeMap::new();
    for video in &playlist.videos {
        if let Some(date) = video.assigned_date {
            by_date.entry(date).or_default().push(video.clone());
        }
    }
    by_date
        .into_iter()
        .map(|(date, videos)| DailyPlan {
            date,
            day_of_week: DayOfWeek::from_date(date),
            videos,
        })
        .collect()
}

/// First date on or after `start` whose weekday is eligible
fn first_eligible(start: NaiveDate, eligible: &[DayOfWeek]) -> Result<NaiveDate, ScheduleError> {
    let mut date = start;
    // At most six steps once at least one weekday is eligible.
    while !eligible.contains(&DayOfWeek::from_date(date)) {
        date = date.succ_opt().ok_or(ScheduleError::OutOfRange)?;
    }
    Ok(date)
}

/// First eligible date strictly after `after`
fn next_eligible(after: NaiveDate, eligible: &[DayOfWeek]) -> Result<NaiveDate, ScheduleError> {
    let next = after.succ_opt().ok_or(ScheduleError::OutOfRange)?;
    first_eligible(next, eligible)
}
